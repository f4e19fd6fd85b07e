use jinjagen::site::{site_ctx, SiteContext, SubPath};

#[test]
fn test_relroot_by_depth() {
    assert_eq!(site_ctx(&SubPath::parse("page")).relroot, "./");
    assert_eq!(site_ctx(&SubPath::parse("a/page")).relroot, "../");
    assert_eq!(site_ctx(&SubPath::parse("a/b/page")).relroot, "../../");
    assert_eq!(site_ctx(&SubPath::parse("a/b/c/d/page")).relroot, "../../../../");
}

#[test]
fn test_root_file() {
    assert_eq!(
        site_ctx(&SubPath::parse("index.html")),
        SiteContext {
            filename: "index.html".to_string(),
            dirpath: ".".to_string(),
            relroot: "./".to_string(),
            path: "./index.html".to_string(),
        }
    );
}

#[test]
fn test_path_is_dirpath_and_filename() {
    for p in ["a/b/page.html", "x/y", "docs/api/v1/index.html"] {
        let ctx = site_ctx(&SubPath::parse(p));
        assert_eq!(ctx.path, format!("{}/{}", ctx.dirpath, ctx.filename));
        assert_eq!(ctx.path, p);
    }
}

#[test]
fn test_collapsed_index_keeps_trailing_dot() {
    let ctx = site_ctx(&SubPath::parse("blog/2024/."));

    assert_eq!(ctx.filename, ".");
    assert_eq!(ctx.dirpath, "blog/2024");
    assert_eq!(ctx.relroot, "../../");
    assert_eq!(ctx.path, "blog/2024/.");
}
