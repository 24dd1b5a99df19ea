use super::*;
use clap::Parser;

#[test]
fn root_defaults_to_current_directory() {
    let cli = Cli::try_parse_from(["quallaa", "graph"]).expect("parse");
    assert_eq!(cli.root, PathBuf::from("."));
    assert!(matches!(cli.command, Commands::Graph));
}

#[test]
fn scan_parses_exclude_and_hidden_flags() {
    let cli = Cli::try_parse_from([
        "quallaa",
        "scan",
        "--exclude",
        "drafts/**",
        "--exclude",
        "archive/**",
        "--include-hidden",
    ])
    .expect("parse");
    match cli.command {
        Commands::Scan(args) => {
            assert_eq!(args.exclude, vec!["drafts/**", "archive/**"]);
            assert!(args.include_hidden);
        }
        _ => panic!("expected scan command"),
    }
}

#[test]
fn suggest_limit_defaults_to_ten() {
    let cli = Cli::try_parse_from(["quallaa", "suggest", "wi"]).expect("parse");
    match cli.command {
        Commands::Suggest(args) => {
            assert_eq!(args.prefix, "wi");
            assert_eq!(args.limit, 10);
        }
        _ => panic!("expected suggest command"),
    }
}

#[test]
fn backlinks_requires_a_note_argument() {
    let parsed = Cli::try_parse_from(["quallaa", "backlinks"]);
    assert!(parsed.is_err(), "backlinks without a note must be rejected");
}

#[test]
fn tags_prefix_is_optional() {
    let cli = Cli::try_parse_from(["quallaa", "tags", "--prefix", "project"]).expect("parse");
    match cli.command {
        Commands::Tags(args) => {
            assert_eq!(args.prefix.as_deref(), Some("project"));
        }
        _ => panic!("expected tags command"),
    }
}
