use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use devbills_client::{Session, SessionUser};

use crate::state::ensure_devbills_home;

/// What `auth login` stored. The token is issued by the identity provider
/// and pasted here; this tool never talks to the provider itself.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub uid: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthState {
    pub fn session_user(&self) -> Option<SessionUser> {
        let token = self.token.clone().filter(|t| !t.is_empty())?;
        Some(SessionUser {
            uid: self.uid.clone().unwrap_or_default(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            token,
        })
    }

    pub fn session(&self) -> Session {
        match self.session_user() {
            Some(user) => Session::signed_in(user),
            None => Session::signed_out(),
        }
    }
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_devbills_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn optional(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

pub fn login() -> Result<()> {
    let token = prompt("Paste your API token")?;
    if token.is_empty() {
        bail!("no token entered");
    }
    let email = optional(prompt("Email (optional)")?);
    let display_name = optional(prompt("Display name (optional)")?);

    let auth = AuthState {
        token: Some(token),
        uid: email.clone(),
        email,
        display_name,
    };
    save_auth(&auth)?;
    tracing::info!("token stored");
    println!("Saved token to ~/.devbills/auth.json");
    Ok(())
}

pub fn logout() -> Result<()> {
    save_auth(&AuthState::default())?;
    println!("Signed out.");
    Ok(())
}

pub fn status() -> Result<()> {
    let auth = load_auth()?;
    match auth.session_user() {
        Some(user) => {
            let who = user
                .display_name
                .or(user.email)
                .unwrap_or_else(|| "(unnamed user)".to_string());
            println!("Signed in as {who}");
        }
        None => println!("Not signed in. Run: devbills auth login"),
    }
    Ok(())
}
