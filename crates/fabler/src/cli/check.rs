//! Script checking command handler.

use fabler::{Command, FablerResult, FileScriptLoader, ScriptLoader};
use std::collections::BTreeMap;
use std::path::Path;

/// Print how each line of `path` parses, without running anything.
///
/// Returns the number of lines with an unusable argument.
pub async fn check_script(path: &Path) -> FablerResult<usize> {
    let mut source = FileScriptLoader::new().open(path).await?;
    let mut invalid = 0;
    let mut number = 0;
    let mut families = BTreeMap::new();

    while let Some(line) = source.next_line().await? {
        number += 1;
        match Command::parse(&line) {
            Ok(Some(command)) => {
                *families.entry(command.family()).or_insert(0usize) += 1;
                println!("{:>4}  {}", number, command);
            }
            Ok(None) => println!("{:>4}  ignored", number),
            Err(e) => {
                invalid += 1;
                println!("{:>4}  invalid: {}", number, e.kind);
            }
        }
    }

    for (family, count) in &families {
        println!("{:>6}  {}", family, count);
    }
    println!("{} lines, {} invalid", number, invalid);
    Ok(invalid)
}
