//! `hostcall config`: Print the effective bridge configuration.

use hostcall_engine::Session;

pub fn execute(session: &Session) -> anyhow::Result<()> {
    print!("{}", session.config().to_toml_string()?);
    Ok(())
}
