//! `hostcall list`: Print exposed functions with their arity.

use hostcall_engine::Session;

pub fn execute(session: &Session) -> anyhow::Result<()> {
    let registry = session.registry();
    let names = registry.names();
    let width = names.iter().map(String::len).max().unwrap_or(0);

    for name in &names {
        if let Some(arity) = registry.arity_of(name) {
            println!("{:<width$}  {}", name, arity, width = width);
        }
    }
    Ok(())
}
