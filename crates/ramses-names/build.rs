//! Packaging artifacts rendered from the clap definitions: one man page per
//! visible command under `$OUT_DIR/man`, and a completion script per
//! supported shell under `$OUT_DIR/completions`.

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;

#[path = "src/cli.rs"]
mod cli;

const BIN_NAME: &str = "ramses-names";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set by Cargo")?);
    let mut cmd = cli::Cli::command();

    let man_dir = artifact_dir(&out_dir, "man")?;
    write_manpages(&cmd, &man_dir)?;

    let completion_dir = artifact_dir(&out_dir, "completions")?;
    for shell in Shell::value_variants() {
        clap_complete::generate_to(*shell, &mut cmd, BIN_NAME, &completion_dir)?;
    }
    Ok(())
}

fn artifact_dir(out_dir: &Path, kind: &str) -> io::Result<PathBuf> {
    let dir = out_dir.join(kind);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Subcommand pages are titled `<parent>-<sub>`, e.g. `ramses-names-ingest.1`.
fn write_manpages(cmd: &clap::Command, dir: &Path) -> io::Result<()> {
    let title = cmd.get_name();
    let mut page = fs::File::create(dir.join(format!("{title}.1")))?;
    clap_mangen::Man::new(cmd.clone()).render(&mut page)?;

    cmd.get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .try_for_each(|sub| {
            let titled = sub.clone().name(format!("{title}-{}", sub.get_name()));
            write_manpages(&titled, dir)
        })
}
