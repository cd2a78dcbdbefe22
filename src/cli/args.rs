use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "shaderlens",
    version,
    about = "Preprocess shader sources and resolve their require directives"
)]
pub struct Args {
    /// Config file (defaults to shaderlens.toml in the shader directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the registry and report every diagnostic
    Check {
        /// Shader source directory
        path: PathBuf,
    },

    /// Print the translation unit for a fragment, dependencies first
    Resolve {
        path: PathBuf,
        /// Logical name of the fragment
        name: String,
        /// Only list the fragment names in build order
        #[arg(long)]
        list: bool,
    },

    /// Print the builtins used by a fragment and its dependencies
    Builtins { path: PathBuf, name: String },

    /// List exported material library functions
    Functions {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Dependency report as Markdown or JSON
    Graph {
        path: PathBuf,
        #[arg(long)]
        json: bool,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// Shader directory the command operates on.
    pub fn path(&self) -> &Path {
        match self {
            Command::Check { path }
            | Command::Resolve { path, .. }
            | Command::Builtins { path, .. }
            | Command::Functions { path, .. }
            | Command::Graph { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let args = Args::parse_from(["shaderlens", "-v", "resolve", "shaders", "a.glsl", "--list"]);
        assert!(args.verbose);
        match args.command {
            Command::Resolve { ref name, list, .. } => {
                assert_eq!(name, "a.glsl");
                assert!(list);
            }
            ref other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(args.command.path(), Path::new("shaders"));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let args = Args::parse_from(["shaderlens", "graph", "shaders", "--config", "x.toml", "-o", "out.md"]);
        assert_eq!(args.config.as_deref(), Some(Path::new("x.toml")));
        match args.command {
            Command::Graph { json, output, .. } => {
                assert!(!json);
                assert_eq!(output.as_deref(), Some(Path::new("out.md")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
