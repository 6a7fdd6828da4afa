use anyhow::{Context as _, Result, bail};
use chrono::Utc;
use clap::Subcommand;
use client::{BootstrapState, PageLocation, SessionBootstrap};
use rpassword::prompt_password;
use shared::models::{RegisterRequest, Role};

use super::{Context, prompt, user_error};

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Sign in with e-mail and password
    Login {
        #[arg(long, short, help = "Account e-mail; prompted for when omitted")]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        email: String,
        #[arg(long, short, default_value_t = Role::Donor, help = "donor, charity, or admin")]
        role: Role,
    },
    /// Tell the platform which role you act as
    SelectRole {
        #[arg(help = "donor, charity, or admin")]
        role: Role,
    },
    /// Forget the stored credential
    Logout,
    /// Show who is signed in
    Status,
    /// Open a page URL the way the web app would, adopting any link credential
    Open {
        #[arg(help = "Page URL or path, e.g. https://carebridge.example/dashboard?token=...")]
        url: String,
    },
}

pub async fn run(ctx: &Context, action: SessionAction) -> Result<()> {
    match action {
        SessionAction::Login { email } => login(ctx, email).await,
        SessionAction::Signup {
            username,
            email,
            role,
        } => signup(ctx, username, email, role).await,
        SessionAction::SelectRole { role } => {
            let target = ctx
                .auth
                .select_role(role)
                .await
                .map_err(|err| user_error(&err, "Failed to select role"))?;
            println!("Role set to {role}. Continue at {target}");
            Ok(())
        }
        SessionAction::Logout => {
            ctx.auth
                .logout()
                .with_context(|| format!("failed to remove {}", ctx.token_path.display()))?;
            println!("Signed out; removed {}", ctx.token_path.display());
            Ok(())
        }
        SessionAction::Status => status(ctx),
        SessionAction::Open { url } => open(ctx, &url),
    }
}

async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    ctx.auth
        .login(&email, &password)
        .await
        .map_err(|err| user_error(&err, "Login failed"))?;

    match ctx.auth.session().role() {
        Ok(Some(role)) => println!(
            "Signed in as {role}. Your dashboard is {}",
            role.landing_route()
        ),
        _ => println!("Signed in. Choose a role with `carebridge session select-role`."),
    }
    Ok(())
}

async fn signup(ctx: &Context, username: String, email: String, role: Role) -> Result<()> {
    let password = prompt_password("Password: ")?;
    let confirm_password = prompt_password("Confirm password: ")?;
    let request = RegisterRequest {
        username,
        email,
        password,
        confirm_password,
        role,
    };

    let credential = ctx
        .auth
        .register(&request)
        .await
        .map_err(|err| user_error(&err, "Registration failed"))?;

    if credential.is_some() {
        println!("Account created and signed in as {role}.");
    } else {
        println!("Account created. Sign in with `carebridge session login`.");
    }
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let session = ctx.auth.session();
    println!("API:        {}", ctx.config.api_base_url);
    println!("Credential: {}", ctx.token_path.display());

    if !session.is_authenticated() {
        println!("Status:     signed out");
        return Ok(());
    }

    match session.claims() {
        Ok(Some(claims)) => {
            println!("Status:     signed in");
            println!(
                "Role:       {}",
                claims.role.as_deref().unwrap_or("(none)")
            );
            if let Some(subject) = claims.subject() {
                println!("Subject:    {subject}");
            }
            if let Some(expiry) = claims.expires_at() {
                let note = if claims.is_expired_at(Utc::now()) {
                    " (expired)"
                } else {
                    ""
                };
                println!("Expires:    {}{note}", expiry.to_rfc3339());
            }
        }
        Ok(None) => println!("Status:     signed out"),
        Err(_) => println!("Status:     stored credential is unreadable; sign in again"),
    }
    Ok(())
}

fn open(ctx: &Context, url: &str) -> Result<()> {
    let location = PageLocation::parse(url, &ctx.config.link_parameter)
        .with_context(|| format!("invalid page URL {url}"))?;
    let mut bootstrap = SessionBootstrap::new(&ctx.auth, location);

    match bootstrap.evaluate() {
        BootstrapState::Authenticated => {
            println!("render {}", bootstrap.location().path);
        }
        state => {
            let target = state
                .redirect_target()
                .map_or_else(|| "/login".to_string(), |route| route.path().to_string());
            println!("redirect {target}");
        }
    }
    Ok(())
}
