//! Flag usage formatting for the CLI help output
//!
//! Renders help in the layout the operational scripts have always printed:
//!
//! ```text
//! Usage:
//!   sg-toolbox delete-pod <POD>
//! Example:
//!   sg-toolbox delete-pod sg-1-host-1-5d8f7-abcde
//!
//! All optional flag's:
//!   --kubeconfig <KUBECONFIG>    Path to kubeconfig file
//!   --namespace <NAMESPACE>      Namespace of the storage-group pods (default storagepod)
//! ```

use clap::{Arg, ArgAction, Command};

/// Usage lines and examples printed ahead of the flag list
#[derive(Debug, Clone, Default)]
pub struct FlagUsage {
    usages: Vec<String>,
    examples: Vec<String>,
}

impl FlagUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required-flags usage line (without the program name)
    pub fn usage(mut self, line: impl Into<String>) -> Self {
        self.usages.push(line.into());
        self
    }

    /// Add an example invocation (without the program name)
    pub fn example(mut self, line: impl Into<String>) -> Self {
        self.examples.push(line.into());
        self
    }

    /// Render help for `cmd`'s own arguments
    pub fn render(&self, program: &str, cmd: &Command) -> String {
        self.render_args(program, cmd.get_arguments())
    }

    /// Render help for an arbitrary set of arguments
    pub fn render_args<'a>(&self, program: &str, args: impl IntoIterator<Item = &'a Arg>) -> String {
        let mut out = String::new();

        if !self.usages.is_empty() {
            out.push_str("Usage:\n");
            for line in &self.usages {
                out.push_str(&format!("  {} {}\n", program, line));
            }
        }

        if !self.examples.is_empty() {
            out.push_str("Example:\n");
            for line in &self.examples {
                out.push_str(&format!("  {} {}\n", program, line));
            }
            out.push('\n');
        }

        out.push_str("All optional flag's:\n");

        let rows: Vec<(String, String)> = args.into_iter().filter_map(flag_row).collect();
        let width = rows.iter().map(|(flag, _)| flag.len()).max().unwrap_or(0);
        for (flag, usage) in rows {
            out.push_str(&format!("{:<width$}    {}\n", flag, usage, width = width));
        }

        out
    }

    /// Install the rendered text as `cmd`'s help output
    pub fn apply(&self, program: &str, cmd: Command) -> Command {
        let help = self.render(program, &cmd);
        cmd.override_help(help)
    }
}

/// Install usage text on each named subcommand. Global flags of `cmd` are
/// listed in every subcommand's flag section.
pub fn apply_to_subcommands(mut cmd: Command, program: &str, usages: &[(&str, FlagUsage)]) -> Command {
    let globals: Vec<Arg> = cmd
        .get_arguments()
        .filter(|a| a.is_global_set())
        .cloned()
        .collect();

    for (name, usage) in usages {
        let globals = globals.clone();
        let sub_program = format!("{} {}", program, name);
        cmd = cmd.mut_subcommand(*name, |sub| {
            let help = usage.render_args(&sub_program, sub.get_arguments().chain(globals.iter()));
            sub.override_help(help)
        });
    }
    cmd
}

/// One `(flag column, usage column)` pair, `None` for args that are not listed
fn flag_row(arg: &Arg) -> Option<(String, String)> {
    if arg.is_hide_set() {
        return None;
    }
    if matches!(
        arg.get_action(),
        ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
    ) {
        return None;
    }

    let help = arg.get_help()?.to_string();
    if help.trim().is_empty() {
        return None;
    }

    let mut flag = match (arg.get_long(), arg.get_short()) {
        (Some(long), _) => format!("  --{}", long),
        (None, Some(short)) => format!("  -{}", short),
        (None, None) => format!("  <{}>", value_name(arg)),
    };
    if !arg.is_positional() && arg.get_action().takes_values() {
        flag.push_str(&format!(" <{}>", value_name(arg)));
    }

    let mut usage = help.replace('\n', "");
    let defaults: Vec<String> = arg
        .get_default_values()
        .iter()
        .map(|v| v.to_string_lossy().into_owned())
        .collect();
    if !defaults.is_empty() {
        usage.push_str(&format!(" (default {})", defaults.join(",")));
    }

    Some((flag, usage))
}

fn value_name(arg: &Arg) -> String {
    arg.get_value_names()
        .and_then(|names| names.first())
        .map(|n| n.to_string())
        .unwrap_or_else(|| arg.get_id().as_str().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_command() -> Command {
        Command::new("gracefully-shutdown")
            .arg(
                Arg::new("kubeconfig")
                    .long("kubeconfig")
                    .value_name("PATH")
                    .help("Path to the kubeconfig file"),
            )
            .arg(
                Arg::new("namespace")
                    .long("namespace")
                    .default_value("storagepod")
                    .help("The service namespace"),
            )
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .help("Run without asking for confirmation"),
            )
            .arg(Arg::new("undocumented").long("undocumented"))
    }

    #[test]
    fn test_render_sections() {
        let usage = FlagUsage::new()
            .usage("--sg-pod-name=<value>")
            .example("--sg-pod-name=sg-1-host-1");
        let out = usage.render("shutdown", &sample_command());

        assert!(out.starts_with("Usage:\n  shutdown --sg-pod-name=<value>\nExample:\n  shutdown --sg-pod-name=sg-1-host-1\n\n"));
        assert!(out.contains("All optional flag's:\n"));
        assert!(out.contains("--kubeconfig <PATH>"));
        assert!(out.contains("The service namespace (default storagepod)"));
        assert!(out.contains("--namespace <NAMESPACE>"));
        assert!(!out.contains("undocumented"));
    }

    #[test]
    fn test_switch_has_no_value_name() {
        let out = FlagUsage::new().render("x", &sample_command());
        let quiet_line = out.lines().find(|l| l.contains("--quiet")).unwrap();
        assert!(!quiet_line.contains('<'));
    }

    #[test]
    fn test_sections_omitted_when_empty() {
        let out = FlagUsage::new().render("x", &sample_command());
        assert!(out.starts_with("All optional flag's:\n"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let out = FlagUsage::new().render("x", &sample_command());
        let starts: Vec<usize> = ["Path to", "The service", "Run without"]
            .iter()
            .map(|text| {
                let line = out.lines().find(|l| l.contains(text)).unwrap();
                line.find(text).unwrap()
            })
            .collect();
        assert_eq!(starts[0], starts[1]);
        assert_eq!(starts[1], starts[2]);
    }

    #[test]
    fn test_apply_to_subcommands_includes_globals() {
        let cmd = Command::new("sg-toolbox")
            .arg(
                Arg::new("namespace")
                    .long("namespace")
                    .global(true)
                    .help("Namespace to work in"),
            )
            .subcommand(
                Command::new("pods").arg(Arg::new("group").long("group").help("Group to match")),
            );
        let usage = FlagUsage::new().example("--group sg-1");
        let mut cmd = apply_to_subcommands(cmd, "sg-toolbox", &[("pods", usage)]);

        let pods = cmd.find_subcommand_mut("pods").unwrap();
        let help = pods.render_help().to_string();
        assert!(help.contains("sg-toolbox pods --group sg-1"));
        assert!(help.contains("--group <GROUP>"));
        assert!(help.contains("--namespace <NAMESPACE>"));
    }
}
