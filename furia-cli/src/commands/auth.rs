//! # Account Commands

use anyhow::Result;

use crate::context::AppContext;

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let auth = ctx.auth().await?;
    auth.login(email, password).await?;
    println!("✅ Logged in as {}", email.trim());
    Ok(())
}

pub async fn register(ctx: &AppContext, name: &str, email: &str, password: &str) -> Result<()> {
    let auth = ctx.auth().await?;
    let message = auth.register(name, email, password).await?;
    println!("✅ {}", message);
    Ok(())
}

pub async fn activate(ctx: &AppContext, email: &str) -> Result<()> {
    let auth = ctx.auth().await?;
    let message = auth.request_activation(email).await?;
    println!("✅ {}", message);
    Ok(())
}

pub async fn reset_password(ctx: &AppContext, password: &str, confirm: &str) -> Result<()> {
    let auth = ctx.auth().await?;
    let message = auth.reset_password(password, confirm).await?;
    println!("✅ {}", message);
    println!("   You can now log in with the new password.");
    Ok(())
}

pub async fn profile(ctx: &AppContext, json: bool) -> Result<()> {
    let auth = ctx.auth().await?;
    let profile = auth.profile().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("Name:          {}", profile.name);
    println!("E-mail:        {}", profile.email);
    println!("Registered on: {}", profile.created_at.format("%d/%m/%Y"));
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    let auth = ctx.auth().await?;
    auth.logout().await?;
    println!("👋 Logged out");
    Ok(())
}
