//! List command - show the supported registry types

use console::style;
use registrar_catalog::Catalog;
use std::fmt::Write;

use crate::error::{CliError, Result};

/// Run the list command
pub fn run() -> Result<()> {
    let catalog = Catalog::builtin()?;
    print!("{}", render(&catalog)?);
    Ok(())
}

fn flag_list<'a>(flags: impl Iterator<Item = &'a &'static str>) -> String {
    let flags: Vec<_> = flags.map(|f| format!("--{}", f)).collect();
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(", ")
    }
}

fn render(catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    let fmt_err = |e: std::fmt::Error| CliError::internal(e.to_string());

    writeln!(
        out,
        "{:<8} {:<12} {:<28} {:<32} {}",
        style("OPTION").bold(),
        style("TYPE").bold(),
        style("DESCRIPTION").bold(),
        style("REQUIRED FLAGS").bold(),
        style("OPTIONAL FLAGS").bold()
    )
    .map_err(fmt_err)?;

    for registry in catalog.iter() {
        let flags = registry.flags();
        writeln!(
            out,
            "{:<8} {:<12} {:<28} {:<32} {}",
            registry.option(),
            style(registry.name()).cyan(),
            registry.caption(),
            flag_list(flags.required.iter()),
            flag_list(flags.optional.iter())
        )
        .map_err(fmt_err)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_backend() {
        console::set_colors_enabled(false);
        let catalog = Catalog::builtin().unwrap();
        let listing = render(&catalog).unwrap();

        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("OPTION"));
        assert!(lines[1].starts_with("1        docker-hub"));
        assert!(lines[4].contains("--key-file, --repository"));
        assert!(lines[3].contains("--password, --password-stdin"));
    }

    #[test]
    fn test_flag_list_empty() {
        let none: Vec<&'static str> = Vec::new();
        assert_eq!(flag_list(none.iter()), "-");
    }
}
