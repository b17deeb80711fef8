//! 资源层级命令
//!
//! 读取描述文件（TOML 或 JSON），校验并展示资源层级。

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use strider_lease::{ResourceForest, ResourceTree};

/// 资源层级命令
#[derive(Subcommand, Debug)]
pub enum TreeCommand {
    /// 校验描述文件
    Check {
        /// 描述文件路径（.toml / .json）
        file: PathBuf,
    },

    /// 列出叶子资源
    Leaves {
        /// 描述文件路径
        file: PathBuf,

        /// 只列出该资源子树下的叶子
        #[arg(short, long)]
        root: Option<String>,
    },

    /// 以缩进形式显示层级
    Show {
        /// 描述文件路径
        file: PathBuf,

        /// 只显示该资源子树
        resource: Option<String>,
    },
}

impl TreeCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            TreeCommand::Check { file } => {
                let forest = load_forest(&file)?;
                let total: usize = forest.roots().iter().map(|root| root.names().len()).sum();
                println!(
                    "OK: {} root(s), {} resource(s)",
                    forest.roots().len(),
                    total
                );
                Ok(())
            },

            TreeCommand::Leaves { file, root } => {
                let forest = load_forest(&file)?;
                let leaves = match root {
                    Some(root) => forest
                        .subtree(&root)
                        .with_context(|| format!("Unknown resource: {}", root))?
                        .leaf_names(),
                    None => forest.leaf_names(),
                };
                for leaf in leaves {
                    println!("{}", leaf);
                }
                Ok(())
            },

            TreeCommand::Show { file, resource } => {
                let forest = load_forest(&file)?;
                match resource {
                    Some(resource) => {
                        let subtree = forest
                            .subtree(&resource)
                            .with_context(|| format!("Unknown resource: {}", resource))?;
                        print_tree(subtree, 0);
                    },
                    None => {
                        for root in forest.roots() {
                            print_tree(root, 0);
                        }
                    },
                }
                Ok(())
            },
        }
    }
}

/// 加载并校验描述文件
pub fn load_forest(path: &Path) -> Result<ResourceForest> {
    let specs = strider_tools::load_spec_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let forest = ResourceForest::build(&specs)
        .with_context(|| format!("Invalid resource tree in {}", path.display()))?;
    tracing::debug!("Resource tree loaded: {} root(s)", forest.roots().len());
    Ok(forest)
}

fn print_tree(tree: &ResourceTree, depth: usize) {
    println!("{}{}", "  ".repeat(depth), tree.name());
    for child in tree.children() {
        print_tree(child, depth + 1);
    }
}
