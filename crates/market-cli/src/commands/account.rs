use super::{finish, prompt};
use crate::render;
use market_application::{AppContext, CatalogUseCase, ProfileUseCase};
use market_core::notification::Notification;
use market_core::user::Registration;
use market_core::{MarketError, Result};
use std::sync::Arc;

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password").map_err(MarketError::from),
    }
}

pub async fn login(ctx: &Arc<AppContext>, username: &str, password: Option<String>) -> bool {
    let result: Result<()> = async {
        let password = password_or_prompt(password)?;
        let session = ctx.session.login(username, &password).await?;
        ctx.notify(Notification::success(format!("Logged in as {}", session.username)));
        Ok(())
    }
    .await;
    finish(ctx, "Login", result)
}

pub async fn register(
    ctx: &Arc<AppContext>,
    username: String,
    password: Option<String>,
    email: String,
    phone: String,
    student_id: String,
) -> bool {
    let result: Result<()> = async {
        let registration = Registration {
            username,
            password: password_or_prompt(password)?,
            email,
            phone,
            student_id,
        };
        ctx.session.register(&registration).await?;
        ctx.notify(Notification::success("Registered, please log in"));
        Ok(())
    }
    .await;
    finish(ctx, "Registration", result)
}

pub async fn logout(ctx: &Arc<AppContext>) -> bool {
    ctx.session.logout().await;
    ctx.caches.clear_all().await;
    ctx.notify(Notification::success("Logged out"));
    true
}

pub async fn whoami(ctx: &Arc<AppContext>) -> bool {
    let result = ctx
        .session
        .require()
        .await
        .map(|session| render::session(&session));
    finish(ctx, "Show user", result)
}

pub async fn stats(ctx: &Arc<AppContext>) -> bool {
    let stats = ProfileUseCase::new(ctx.clone()).system_stats().await;
    render::system_stats(&stats);
    true
}

pub async fn profile(ctx: &Arc<AppContext>) -> bool {
    let result: Result<()> = async {
        ctx.session.require().await?;
        if let Err(e) = CatalogUseCase::new(ctx.clone()).load_my_items().await {
            tracing::warn!("[Profile] Failed to load my items: {}", e);
        }
        let profile = ProfileUseCase::new(ctx.clone()).profile().await?;
        render::profile(&profile);
        Ok(())
    }
    .await;
    finish(ctx, "Load profile", result)
}
