use clap::Parser;
use jinjagen::cli::Args;
use jinjagen::hooks::ModuleRequest;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("jinjagen")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&["./out"])).unwrap();

    assert_eq!(parsed.output_dir, PathBuf::from("./out"));
    assert_eq!(parsed.root, PathBuf::from("."));
    assert!(parsed.modules.is_empty());
    assert!(parsed.context.is_none());
    assert!(!parsed.keep_trailing_newline);
    assert!(!parsed.verbose);
}

#[test]
fn test_root_and_modules_in_order() {
    let args = make_args(&[
        "out",
        "--root",
        "site",
        "-m",
        "jinjagenadd:draft,beta",
        "--module",
        "pathutil",
        "-m",
        "other:a:b",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.root, PathBuf::from("site"));
    assert_eq!(
        parsed.modules,
        vec![
            ModuleRequest { name: "jinjagenadd".into(), subparam: Some("draft,beta".into()) },
            ModuleRequest { name: "pathutil".into(), subparam: None },
            ModuleRequest { name: "other".into(), subparam: Some("a:b".into()) },
        ]
    );
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-r", "src", "-c", "ctx.yaml", "-v", "--keep-trailing-newline", "out"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.root, PathBuf::from("src"));
    assert_eq!(parsed.context, Some(PathBuf::from("ctx.yaml")));
    assert!(parsed.verbose);
    assert!(parsed.keep_trailing_newline);
}

#[test]
fn test_empty_module_name() {
    assert!(Args::try_parse_from(make_args(&["out", "-m", ":flag"])).is_err());
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["out", "extra"])).is_err());
}
