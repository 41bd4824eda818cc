//! Tests for fetch and local subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand, FormatArg};
use clap::Parser;
use collage_core::config::{CollageConfig, FormatName};
use std::path::Path;

#[test]
fn cli_parse_fetch_with_url() {
    match parse(&["collage", "fetch", "https://disk.example/d/abc"]) {
        CliCommand::Fetch {
            url,
            api_url,
            extract_dir,
            layout,
            output,
        } => {
            assert_eq!(url.as_deref(), Some("https://disk.example/d/abc"));
            assert!(api_url.is_none());
            assert!(extract_dir.is_none());
            assert!(layout.columns.is_none());
            assert!(output.output.is_none());
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_without_url_prompts_later() {
    match parse(&["collage", "fetch"]) {
        CliCommand::Fetch { url, .. } => assert!(url.is_none()),
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_options() {
    match parse(&[
        "collage",
        "fetch",
        "https://disk.example/d/abc",
        "--api-url",
        "https://api.example/?public_key=",
        "--extract-dir",
        "/tmp/x",
        "--columns",
        "5",
        "--margin",
        "0",
        "--format",
        "tiff",
    ]) {
        CliCommand::Fetch {
            api_url,
            extract_dir,
            layout,
            output,
            ..
        } => {
            assert_eq!(api_url.as_deref(), Some("https://api.example/?public_key="));
            assert_eq!(extract_dir.as_deref(), Some(Path::new("/tmp/x")));
            assert_eq!(layout.columns, Some(5));
            assert_eq!(layout.margin, Some(0));
            assert_eq!(output.format, Some(FormatArg::Tiff));
        }
        _ => panic!("expected Fetch with options"),
    }
}

#[test]
fn cli_parse_local() {
    match parse(&["collage", "local", "photos", "-o", "out.png", "--cell-width", "64"]) {
        CliCommand::Local {
            dir,
            layout,
            output,
        } => {
            assert_eq!(dir, Path::new("photos"));
            assert_eq!(layout.cell_width, Some(64));
            assert!(layout.cell_height.is_none());
            assert_eq!(output.output.as_deref(), Some(Path::new("out.png")));
        }
        _ => panic!("expected Local"),
    }
}

#[test]
fn cli_parse_global_config_flag() {
    let cli = Cli::try_parse_from(["collage", "local", "d", "--config", "/etc/c.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/c.toml")));
}

#[test]
fn cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["collage", "local", "d", "--format", "gif"]).is_err());
}

#[test]
fn output_args_override_config() {
    let mut cfg = CollageConfig::default();
    cfg.output.format = Some(FormatName::Tiff);
    let args = match parse(&["collage", "local", "d", "-o", "c.png", "--quality", "70"]) {
        CliCommand::Local { output, .. } => output,
        _ => panic!("expected Local"),
    };
    args.apply(&mut cfg);
    assert_eq!(cfg.output.path.as_deref(), Some(Path::new("c.png")));
    // Format re-derived from the new path.
    assert!(cfg.output.format.is_none());
    assert_eq!(cfg.output.jpeg_quality, 70);
}

#[test]
fn layout_args_override_only_given_fields() {
    let mut cfg = CollageConfig::default();
    let args = match parse(&["collage", "local", "d", "--columns", "3"]) {
        CliCommand::Local { layout, .. } => layout,
        _ => panic!("expected Local"),
    };
    args.apply(&mut cfg);
    assert_eq!(cfg.layout.columns, 3);
    assert_eq!(cfg.layout.cell_width, 800);
    assert_eq!(cfg.layout.margin, 100);
}
