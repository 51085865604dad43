use std::path::Path;

/// Execute the args subcommand: print the resolved invocation as JSON.
///
/// Nothing is spawned. Errors are returned for `miette` to render.
pub fn run(root: &Path) -> miette::Result<()> {
    let invocation = super::adapter().prepare(root)?;
    let json = serde_json::to_string_pretty(&invocation)
        .map_err(|e| miette::miette!("failed to serialize invocation: {e}"))?;
    println!("{json}");
    Ok(())
}
