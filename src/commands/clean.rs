//! Clean command - removes a working tree.

use anyhow::Result;
use std::path::Path;

use crate::clean::remove_work_tree;
use crate::stage::WorkTree;

/// Execute the clean command.
pub fn cmd_clean(output_dir: &Path) -> Result<()> {
    let tree = WorkTree::new(output_dir);
    if remove_work_tree(tree.root())? {
        println!("Clean complete (collected packages preserved).");
    } else {
        println!("No working tree to clean at {}.", tree.root().display());
    }
    Ok(())
}
