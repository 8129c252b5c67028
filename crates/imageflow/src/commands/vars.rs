use super::prepare;
use crate::args::ImportArgs;
use imageflow_config::Settings;

pub fn handle(args: &ImportArgs, settings: &Settings) -> anyhow::Result<()> {
    let prepared = prepare(args, settings)?;
    println!("{}", serde_json::to_string_pretty(&prepared.vars)?);
    Ok(())
}
