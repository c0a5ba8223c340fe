use std::io::Write;

use clap::Parser;

use super::*;

fn raw_with_project() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.sanity.project_id = Some("abc123".to_string());
    raw
}

#[test]
fn defaults_match_hosted_cms_conventions() {
    let settings = Settings::from_raw(raw_with_project()).expect("valid settings");

    assert_eq!(settings.sanity.dataset, "production");
    assert_eq!(settings.sanity.api_version, "2024-01-01");
    assert!(settings.sanity.use_cdn);
    assert_eq!(
        settings.sanity.api_base.as_str(),
        "https://abc123.apicdn.sanity.io/"
    );
    assert_eq!(settings.sanity.cdn_base.as_str(), "https://cdn.sanity.io/");
    assert_eq!(settings.sanity.token, None);
    assert_eq!(settings.site.url.as_str(), "http://localhost:4321/");
    assert_eq!(settings.site.domain, "localhost");
    assert_eq!(settings.site.language, "en");
    assert_eq!(settings.build.output_dir, PathBuf::from("dist"));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn project_id_is_required() {
    let err = Settings::from_raw(RawSettings::default()).expect_err("missing project id");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "sanity.project_id",
            ..
        }
    ));
}

#[test]
fn uncached_api_uses_live_host() {
    let mut raw = raw_with_project();
    raw.sanity.use_cdn = Some(false);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.sanity.api_base.as_str(),
        "https://abc123.api.sanity.io/"
    );
}

#[test]
fn api_host_override_gains_trailing_slash() {
    let mut raw = raw_with_project();
    raw.sanity.api_host = Some("http://127.0.0.1:9000/proxy".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.sanity.api_base.as_str(),
        "http://127.0.0.1:9000/proxy/"
    );
}

#[test]
fn rejects_malformed_api_version() {
    let mut raw = raw_with_project();
    raw.sanity.api_version = Some("2024-13-01".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid api version");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "sanity.api_version",
            ..
        }
    ));
}

#[test]
fn rejects_non_http_site_url() {
    let mut raw = raw_with_project();
    raw.site.url = Some("ftp://example.com".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn explicit_domain_wins_over_url_host() {
    let mut raw = raw_with_project();
    raw.site.url = Some("https://www.portfolio.test".to_string());
    raw.site.domain = Some("portfolio.test".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.domain, "portfolio.test");
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_project();
    raw.sanity.dataset = Some("staging".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = GlobalOverrides {
        sanity_dataset: Some("preview".to_string()),
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        ..Default::default()
    };
    raw.apply_global_overrides(&overrides);
    raw.apply_build_overrides(&BuildArgs {
        output: Some(PathBuf::from("public")),
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.sanity.dataset, "preview");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(settings.build.output_dir, PathBuf::from("public"));
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from(["atelier", "render", "body.json", "--log-level", "warn"]);
    match args.command {
        Command::Render(render) => {
            assert_eq!(render.file, Some(PathBuf::from("body.json")));
            assert_eq!(render.slug, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(args.overrides.log_level.as_deref(), Some("warn"));
}

#[test]
fn render_file_and_slug_conflict() {
    let result = CliArgs::try_parse_from(["atelier", "render", "body.json", "--slug", "hello"]);
    assert!(result.is_err());
}

#[test]
fn parse_build_arguments() {
    let args = CliArgs::parse_from([
        "atelier",
        "build",
        "--output",
        "out",
        "--site-url",
        "https://portfolio.test",
    ]);
    match args.command {
        Command::Build(build) => assert_eq!(build.output, Some(PathBuf::from("out"))),
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(
        args.overrides.site_url.as_deref(),
        Some("https://portfolio.test")
    );
}

#[test]
fn config_file_layer_is_loaded() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    writeln!(
        file,
        "[site]\nurl = \"https://portfolio.test\"\ntitle = \"Studio\"\n\n[sanity]\nproject_id = \"fromfile\"\n\n[build]\noutput_dir = \"site\""
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let args = CliArgs::parse_from([
        "atelier",
        "build",
        "--config-file",
        path.as_str(),
        "--sanity-project-id",
        "fromcli",
    ]);
    let settings = load(&args).expect("settings");

    assert_eq!(settings.site.title, "Studio");
    assert_eq!(settings.site.domain, "portfolio.test");
    assert_eq!(settings.sanity.project_id, "fromcli");
    assert_eq!(settings.build.output_dir, PathBuf::from("site"));
}
