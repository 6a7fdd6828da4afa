use anyhow::{Result, anyhow, bail};
use clap::Subcommand;
use client::{CrudViewModel, PageLocation, PageOutcome, ProtectedPage, Resource, resources};
use shared::{
    models::{
        Beneficiary, BeneficiaryDraft, Charity, CharityDraft, Donation, DonationDraft,
        DonationSummary, Story, StoryDraft,
    },
    routes::Route,
};

use super::{Context, check, confirm, user_error};

#[derive(Subcommand, Debug)]
pub enum BeneficiaryAction {
    /// List beneficiaries
    List {
        #[arg(long, short, help = "Only show beneficiaries whose name or charity matches")]
        search: Option<String>,
    },
    /// Add a beneficiary
    Create {
        #[arg(long)]
        charity_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        needs: String,
    },
    /// Change a beneficiary
    Update {
        id: i64,
        #[arg(long)]
        charity_id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        needs: Option<String>,
    },
    /// Remove a beneficiary
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum StoryAction {
    /// List impact stories
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Publish a story
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Change a story
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove a story
    Delete {
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DonationAction {
    /// List donations
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Make a donation
    Create {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        charity_id: i64,
        #[arg(long, help = "Name shown to the charity; ignored with --anonymous")]
        donor_name: Option<String>,
        #[arg(long)]
        anonymous: bool,
        #[arg(long, default_value = "money")]
        donation_type: String,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        beneficiary_id: Option<i64>,
    },
    /// Remove a donation record
    Delete { id: i64 },
    /// Show donation totals
    Summary,
}

#[derive(Subcommand, Debug)]
pub enum CharityAction {
    /// List charities
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Apply to register a charity
    Apply {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Change a charity
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a charity
    Delete { id: i64 },
    /// Show or change your charity's profile
    Settings {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        logo: Option<String>,
    },
}

pub async fn beneficiaries(ctx: &Context, action: BeneficiaryAction) -> Result<()> {
    const PAGE: Route = Route::Beneficiaries;
    match action {
        BeneficiaryAction::List { search } => list::<Beneficiary>(ctx, PAGE, search).await,
        BeneficiaryAction::Create {
            charity_id,
            name,
            needs,
        } => {
            let draft = BeneficiaryDraft {
                charity_id: Some(charity_id),
                name,
                needs,
            };
            create::<Beneficiary>(ctx, PAGE, draft).await
        }
        BeneficiaryAction::Update {
            id,
            charity_id,
            name,
            needs,
        } => {
            update::<Beneficiary>(ctx, PAGE, id, |draft| {
                if charity_id.is_some() {
                    draft.charity_id = charity_id;
                }
                replace(&mut draft.name, name);
                replace(&mut draft.needs, needs);
            })
            .await
        }
        BeneficiaryAction::Delete { id } => delete::<Beneficiary>(ctx, PAGE, id, false).await,
    }
}

pub async fn stories(ctx: &Context, action: StoryAction) -> Result<()> {
    const PAGE: Route = Route::ImpactStories;
    match action {
        StoryAction::List { search } => list::<Story>(ctx, PAGE, search).await,
        StoryAction::Create {
            title,
            content,
            image_url,
        } => {
            let draft = StoryDraft {
                title,
                content,
                image_url: image_url.unwrap_or_default(),
            };
            create::<Story>(ctx, PAGE, draft).await
        }
        StoryAction::Update {
            id,
            title,
            content,
            image_url,
        } => {
            update::<Story>(ctx, PAGE, id, |draft| {
                replace(&mut draft.title, title);
                replace(&mut draft.content, content);
                replace(&mut draft.image_url, image_url);
            })
            .await
        }
        StoryAction::Delete { id, yes } => delete::<Story>(ctx, PAGE, id, yes).await,
    }
}

pub async fn donations(ctx: &Context, action: DonationAction) -> Result<()> {
    const PAGE: Route = Route::ManageDonations;
    match action {
        DonationAction::List { search } => list::<Donation>(ctx, PAGE, search).await,
        DonationAction::Create {
            amount,
            charity_id,
            donor_name,
            anonymous,
            donation_type,
            category_id,
            beneficiary_id,
        } => {
            let draft = DonationDraft {
                amount,
                charity_id: Some(charity_id),
                category_id,
                beneficiary_id,
                donation_type,
                donor_name: donor_name.unwrap_or_default(),
                is_anonymous: anonymous,
                ..DonationDraft::default()
            };
            create::<Donation>(ctx, PAGE, draft).await
        }
        DonationAction::Delete { id } => delete::<Donation>(ctx, PAGE, id, false).await,
        DonationAction::Summary => {
            let vm = open_page::<Donation>(ctx, PAGE).await?;
            if let Some(message) = vm.last_error() {
                bail!("{message}");
            }
            print_summary(&DonationSummary::from_donations(vm.records()));
            Ok(())
        }
    }
}

pub async fn charities(ctx: &Context, action: CharityAction) -> Result<()> {
    const PAGE: Route = Route::Search;
    match action {
        CharityAction::List { search } => list::<Charity>(ctx, PAGE, search).await,
        CharityAction::Apply { name, description } => {
            create::<Charity>(ctx, PAGE, CharityDraft { name, description }).await
        }
        CharityAction::Update {
            id,
            name,
            description,
        } => {
            update::<Charity>(ctx, PAGE, id, |draft| {
                replace(&mut draft.name, name);
                replace(&mut draft.description, description);
            })
            .await
        }
        CharityAction::Delete { id } => delete::<Charity>(ctx, PAGE, id, false).await,
        CharityAction::Settings {
            name,
            description,
            email,
            logo,
        } => settings(ctx, name, description, email, logo).await,
    }
}

fn replace(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn redirected(page: Route, target: Route) -> anyhow::Error {
    match target {
        Route::Login => anyhow!("not signed in; run `carebridge session login` first"),
        other => anyhow!("{page} is not available to your role; continue at {other}"),
    }
}

/// Run the page bootstrap, failing with a hint when it redirects.
async fn open_page<R: Resource>(ctx: &Context, page: Route) -> Result<CrudViewModel<R>> {
    let outcome = ProtectedPage::new(&ctx.auth)
        .open::<R>(PageLocation::new(page.path()))
        .await;
    match outcome {
        PageOutcome::Rendered(vm) => Ok(vm),
        PageOutcome::Redirect(target) => Err(redirected(page, target)),
    }
}

async fn list<R: Resource>(ctx: &Context, page: Route, search: Option<String>) -> Result<()> {
    let mut vm = open_page::<R>(ctx, page).await?;
    if let Some(message) = vm.last_error() {
        bail!("{message}");
    }
    if let Some(search) = search {
        vm.set_filter(search);
    }
    print_records(&vm);
    Ok(())
}

async fn create<R: Resource>(ctx: &Context, page: Route, draft: R::Draft) -> Result<()> {
    let mut vm = open_page::<R>(ctx, page).await?;
    let result = vm.create(draft).await;
    check(&vm, result)?;
    print_notice(&vm);
    Ok(())
}

async fn update<R: Resource>(
    ctx: &Context,
    page: Route,
    id: i64,
    edit: impl FnOnce(&mut R::Draft),
) -> Result<()> {
    let mut vm = open_page::<R>(ctx, page).await?;
    if !vm.begin_edit(id) {
        match vm.last_error() {
            Some(message) => bail!("{message}"),
            None => bail!("no {} with id {id}", R::DESCRIPTOR.singular),
        }
    }
    if let Some(draft) = vm.edit_draft_mut() {
        edit(draft);
    }
    let result = vm.save_edit().await;
    check(&vm, result)?;
    print_notice(&vm);
    Ok(())
}

async fn delete<R: Resource>(ctx: &Context, page: Route, id: i64, yes: bool) -> Result<()> {
    let mut vm = open_page::<R>(ctx, page).await?;
    let prompt = R::DESCRIPTOR.delete_prompt();
    let result = vm.delete(id, |_| yes || confirm(&prompt)).await;
    if check(&vm, result)? {
        print_notice(&vm);
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

async fn settings(
    ctx: &Context,
    name: Option<String>,
    description: Option<String>,
    email: Option<String>,
    logo: Option<String>,
) -> Result<()> {
    const PAGE: Route = Route::CharitySettings;
    ProtectedPage::new(&ctx.auth)
        .enter(PageLocation::new(PAGE.path()))
        .map_err(|target| redirected(PAGE, target))?;

    let client = ctx.auth.client();
    let mut current = resources::fetch_charity_settings(client)
        .await
        .map_err(|err| user_error(&err, "Failed to load settings"))?;

    let changing = name.is_some() || description.is_some() || email.is_some() || logo.is_some();
    if changing {
        replace(&mut current.name, name);
        replace(&mut current.description, description);
        replace(&mut current.email, email);
        if logo.is_some() {
            current.logo = logo;
        }
        current = resources::update_charity_settings(client, &current)
            .await
            .map_err(|err| user_error(&err, "Failed to update settings"))?;
        println!("Settings updated successfully");
    }

    println!("Name:        {}", current.name);
    println!("Description: {}", current.description);
    println!("Email:       {}", current.email);
    if let Some(logo) = &current.logo {
        println!("Logo:        {logo}");
    }
    Ok(())
}

fn print_records<R: Resource>(vm: &CrudViewModel<R>) {
    let visible = vm.visible();
    if visible.is_empty() {
        println!("No {} found.", R::DESCRIPTOR.plural);
        return;
    }
    for record in visible {
        let card = record.card();
        println!("#{:<5} {}", record.id(), card.title);
        if !card.body.is_empty() {
            println!("       {}", card.body);
        }
        if let Some(meta) = card.meta {
            println!("       [{meta}]");
        }
    }
}

fn print_notice<R: Resource>(vm: &CrudViewModel<R>) {
    if let Some(notice) = vm.notice() {
        println!("{notice}");
    }
    if let Some(message) = vm.last_error() {
        eprintln!("warning: {message}");
    }
}

fn print_summary(summary: &DonationSummary) {
    println!("Total:      ${:.2}", summary.total);
    println!("Named:      ${:.2}", summary.named);
    println!("Anonymous:  ${:.2}", summary.anonymous);
    println!("Completed:  {}", summary.completed_count);
}
