//! Command-line arguments of the harness binary
//!
//! `cargo test` forwards its own libtest flags (`--nocapture`, `--test-threads`
//! and friends) to `harness = false` binaries. Those are stripped before clap
//! sees the argument list; every other argument is parsed normally, so a typo
//! in one of our flags is still an error.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::RunnerConfig;

/// libtest switches without a value
const LIBTEST_SWITCHES: &[&str] = &[
    "--nocapture",
    "--show-output",
    "--exact",
    "--ignored",
    "--include-ignored",
    "--quiet",
    "-q",
];

/// libtest options that take a value, as `--opt value` or `--opt=value`
const LIBTEST_OPTIONS: &[&str] = &["--test-threads", "--color", "--format", "--skip", "-Z"];

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "reqres-e2e")]
#[command(about = "API contract suite for the reqres user/login endpoints")]
pub struct HarnessArgs {
    /// Scheme and host of the service, e.g. https://reqres.in (default: in-process stub).
    /// A trailing base path such as /api is accepted and not repeated.
    #[arg(long)]
    pub base_url: Option<String>,

    /// API key sent as x-api-key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Run only scenarios matching this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only a specific scenario by name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Golden-values YAML file
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// libtest name filter; accepted and ignored
    #[arg(hide = true)]
    pub filter: Vec<String>,
}

impl HarnessArgs {
    /// Parses `args` after dropping libtest flags.
    pub fn try_parse_harness<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(strip_libtest_args(args))
    }

    /// Applies the flags that were given on top of `config`
    pub fn apply(&self, mut config: RunnerConfig) -> RunnerConfig {
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(path) = &self.fixtures {
            config.fixtures_path = Some(path.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        config
    }
}

fn strip_libtest_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut kept = Vec::new();
    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            kept.push(arg);
            continue;
        };
        if LIBTEST_SWITCHES.contains(&text) {
            continue;
        }
        if LIBTEST_OPTIONS.contains(&text) {
            args.next();
            continue;
        }
        let inline_option = LIBTEST_OPTIONS.iter().any(|opt| {
            text.strip_prefix(opt)
                .is_some_and(|rest| rest.starts_with('='))
        });
        if !inline_option {
            kept.push(arg);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_flags_survive_libtest_switches() {
        let args =
            HarnessArgs::try_parse_harness(["e2e", "--name", "missing_password", "--nocapture"])
                .unwrap();
        assert_eq!(args.name.as_deref(), Some("missing_password"));
    }

    #[test]
    fn test_list_with_libtest_options() {
        let args = HarnessArgs::try_parse_harness([
            "e2e",
            "--test-threads",
            "1",
            "--list",
            "--color=never",
            "-q",
        ])
        .unwrap();
        assert!(args.list);
        assert!(args.filter.is_empty());
    }

    #[test]
    fn test_base_url_and_tag_are_kept() {
        let args = HarnessArgs::try_parse_harness([
            "e2e",
            "--exact",
            "--base-url",
            "https://reqres.in",
            "--tag",
            "smoke",
            "login",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("https://reqres.in"));
        assert_eq!(args.tag.as_deref(), Some("smoke"));
        assert_eq!(args.filter, vec!["login".to_string()]);
    }

    #[test]
    fn test_unknown_flag_is_still_an_error() {
        let err = HarnessArgs::try_parse_harness(["e2e", "--base-uri", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let args = HarnessArgs::try_parse_harness(["e2e", "--api-key", "reqres-free-v1"]).unwrap();
        let base = RunnerConfig {
            base_url: Some("https://reqres.in".to_string()),
            ..Default::default()
        };
        let config = args.apply(base);
        assert_eq!(config.base_url.as_deref(), Some("https://reqres.in"));
        assert_eq!(config.api_key.as_deref(), Some("reqres-free-v1"));
        assert!(config.fixtures_path.is_none());
    }
}
