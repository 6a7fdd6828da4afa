use anyhow::Result;
use clap::Args;
use client::volunteer::{self, VOLUNTEER_FAILED};
use shared::models::VolunteerApplication;

use super::{Context, user_error};

#[derive(Args, Debug)]
pub struct VolunteerArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, short, help = "Why you want to volunteer")]
    message: Option<String>,
}

pub async fn run(ctx: &Context, args: VolunteerArgs) -> Result<()> {
    let application = VolunteerApplication {
        name: args.name,
        email: args.email,
        phone: args.phone,
        message: args.message.unwrap_or_default(),
    };
    let notice = volunteer::sign_up(ctx.auth.client(), &application)
        .await
        .map_err(|err| user_error(&err, VOLUNTEER_FAILED))?;
    println!("{notice}");
    Ok(())
}
