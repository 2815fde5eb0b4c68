//! One-shot deployment credential bootstrap.
//!
//! Prompts the operator for the pipeline access token and writes it to
//! Secrets Manager under the configured name. The target account and region
//! are explicit inputs from the deployment configuration; the STS caller
//! identity is shown alongside them so the operator can spot a profile
//! mismatch before anything is written. There are no retries: a failure
//! means fix the input and re-run.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use aws_config::{BehaviorVersion, Region};
use tracing::info;

use lakestack_core::Configuration;

/// Validate the operator-supplied token before any network call is made.
fn validate_token(token: &str) -> Result<&str> {
    let token = token.trim();
    if token.is_empty() {
        bail!("a value must be provided for the pipeline access token");
    }
    Ok(token)
}

/// Whether the operator answered yes.
fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Print a prompt and read one line from stdin.
fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush().context("cannot flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("cannot read from stdin")?;
    Ok(line)
}

/// Run the bootstrap: prompt, confirm, write.
pub async fn configure_secret(configuration: &Configuration) -> Result<()> {
    let deployment = configuration.deployment()?;

    let raw = prompt("Enter pipeline access token value: ")?;
    let token = validate_token(&raw)?.to_owned();

    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(deployment.region.as_str().to_owned()))
        .load()
        .await;

    let sts = aws_sdk_sts::Client::new(&shared);
    let identity = sts
        .get_caller_identity()
        .send()
        .await
        .context("cannot determine caller identity")?;
    let caller_account = identity.account().unwrap_or("unknown");

    let answer = prompt(&format!(
        "\nAbout to write secret {} to account {} in region {}.\n\
         This should be the central deployment account.\n\
         Current credentials resolve to account {caller_account}.\n\n\
         Continue? (y/n) ",
        deployment.secret_name, deployment.account_id, deployment.region,
    ))?;
    if !is_confirmed(&answer) {
        info!("aborted; no secret was written");
        return Ok(());
    }

    let secrets = aws_sdk_secretsmanager::Client::new(&shared);
    secrets
        .create_secret()
        .name(&deployment.secret_name)
        .secret_string(token)
        .send()
        .await
        .with_context(|| format!("cannot create secret {}", deployment.secret_name))?;

    info!(secret = %deployment.secret_name, "secret created");
    Ok(())
}
