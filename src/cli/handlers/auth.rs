use std::io::BufRead;

use crate::cli::commands::{LoginArgs, RegisterArgs};
use crate::context::AppContext;
use crate::ops::task_ops;
use crate::store::StoreError;

use super::{CmdResult, report};

/// Use the flag value, or read one line from stdin
fn password_or_stdin(flag: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(p) = flag {
        return Ok(p);
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn cmd_login(ctx: &AppContext, args: LoginArgs, json: bool) -> CmdResult {
    let password = password_or_stdin(args.password)?;
    task_ops::validate_login(&args.email, &password)?;

    let api = ctx.api()?;
    let session = api
        .login(args.email.trim(), &password)
        .map_err(|e| StoreError::from(e).to_string())?;
    ctx.sessions().save(&session)?;
    report(&format!("Logged in as {}", session.user.username), None, json)
}

pub fn cmd_register(ctx: &AppContext, args: RegisterArgs, json: bool) -> CmdResult {
    let password = password_or_stdin(args.password)?;
    task_ops::validate_registration(&args.username, &args.email, &password)?;

    let api = ctx.api()?;
    let message = api
        .register(args.username.trim(), args.email.trim(), &password)
        .map_err(|e| StoreError::from(e).to_string())?;
    report(&message, None, json)
}

pub fn cmd_logout(ctx: &AppContext) -> CmdResult {
    ctx.sessions().clear()?;
    println!("Logged out");
    Ok(())
}
