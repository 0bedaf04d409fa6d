//! Profile command handlers.

use anyhow::Result;
use lexa_core::context::AppContext;
use lexa_core::profile::{ProfilePatch, format_full_address};

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl From<FieldArgs> for ProfilePatch {
    fn from(fields: FieldArgs) -> Self {
        ProfilePatch {
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            role: fields.role,
            address: fields.address,
            postal_code: fields.postal_code,
            city: fields.city,
            country: fields.country,
        }
    }
}

pub fn show(ctx: &AppContext) -> Result<()> {
    let p = &ctx.profile.profile;
    println!("first_name:  {}", p.first_name);
    println!("last_name:   {}", p.last_name);
    println!("email:       {}", p.email);
    println!("phone:       {}", p.phone);
    println!("company:     {}", p.company);
    println!("role:        {}", p.role);
    println!("address:     {}", p.address);
    println!("postal_code: {}", p.postal_code);
    println!("city:        {}", p.city);
    println!("country:     {}", p.country);
    Ok(())
}

pub fn set(ctx: &mut AppContext, fields: FieldArgs) -> Result<()> {
    ctx.update_profile(fields.into())?;
    println!("Profile updated.");
    Ok(())
}

pub fn reset(ctx: &mut AppContext) -> Result<()> {
    ctx.reset_profile()?;
    println!("Profile reset.");
    Ok(())
}

pub fn address(ctx: &AppContext) -> Result<()> {
    println!("{}", format_full_address(&ctx.profile.profile));
    Ok(())
}
