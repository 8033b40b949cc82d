//! Local sign-in. The signed-in user is stored in the config file.

use tomatask_core::{Config, Identity, UserId};

use crate::common::CliResult;

pub fn login(user: &str) -> CliResult {
    let user = UserId::new(user).ok_or("user id must not be blank")?;
    let mut config = Config::load()?;
    config.identity.user_id = Some(user.as_str().to_string());
    config.save()?;
    tracing::info!(user = %user, "Signed in");
    println!("signed in as {user}");
    Ok(())
}

pub fn logout() -> CliResult {
    let mut config = Config::load()?;
    config.identity.user_id = None;
    config.save()?;
    println!("signed out");
    Ok(())
}

pub fn whoami() -> CliResult {
    match Config::load()?.identity() {
        Identity::Authenticated(user) => println!("{user}"),
        Identity::Anonymous => println!("anonymous"),
    }
    Ok(())
}
