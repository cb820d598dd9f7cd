//! `sign-in` and `sign-up`.

use clap::Args;
use urban_shield_backend::{SignInForm, SignUpForm, SupabaseClient};
use urban_shield_user_models::UserType;

use crate::{Credentials, parse_user_type};

#[derive(Args)]
pub struct SignUpArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    username: String,
    /// One of the signup user types (admin accounts are created elsewhere)
    #[arg(long, value_parser = parse_user_type, default_value = "guest")]
    user_type: UserType,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    organization_name: Option<String>,
    #[arg(long)]
    organization_type: Option<String>,
    #[arg(long)]
    business_license: Option<String>,
}

impl From<SignUpArgs> for SignUpForm {
    fn from(args: SignUpArgs) -> Self {
        Self {
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            full_name: args.full_name,
            username: args.username,
            phone_number: args.phone_number,
            user_type: args.user_type,
            address: args.address,
            city: args.city,
            state: args.state,
            organization_name: args.organization_name,
            organization_type: args.organization_type,
            business_license: args.business_license,
        }
    }
}

impl From<Credentials> for SignInForm {
    fn from(credentials: Credentials) -> Self {
        Self {
            email: credentials.email,
            password: credentials.password,
        }
    }
}

pub async fn sign_in(credentials: Credentials) -> Result<(), Box<dyn std::error::Error>> {
    let client = SupabaseClient::from_env()?;
    let session = client.sign_in(&credentials.into()).await?;
    let client = client.with_session(session.clone());

    println!("Signed in as {}", session.user.email.as_deref().unwrap_or("(no email)"));
    println!("  User id: {}", session.user.id);
    if let Some(profile) = client.profile(session.user.id).await? {
        let user_type = profile.user_type();
        let config = urban_shield_permissions::get_config(user_type);
        println!(
            "  Profile: {} ({})",
            profile.username.as_deref().unwrap_or("-"),
            config.name
        );
        println!("  Posting: {}", config.posting_privilege);
    }
    Ok(())
}

pub async fn sign_up(args: SignUpArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = SignUpForm::from(args);
    let client = SupabaseClient::from_env()?;
    let outcome = client.sign_up(&form).await?;

    println!("Account created for {}", form.email.trim());
    println!("  User id: {}", outcome.user.id);
    if outcome.session.is_none() {
        println!("  Check your email to confirm the account before signing in.");
    }
    Ok(())
}
