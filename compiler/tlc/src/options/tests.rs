use pretty_assertions::assert_eq;

use super::*;

fn parse(args: &[&str]) -> CompileOptions {
    let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
    parse_compile_options(&args)
}

#[test]
fn test_defaults() {
    let options = parse(&[]);
    assert_eq!(options, CompileOptions::default());
    assert!(!options.debug_info);
    assert_eq!(options.error_limit, 0);
    assert_eq!(options.diagnostic_config().error_limit, 0);
    assert_eq!(options.color, ColorMode::Auto);
}

#[test]
fn test_all_flags() {
    let options = parse(&["-g", "--error-limit=5", "--color=never"]);
    assert_eq!(
        options,
        CompileOptions {
            debug_info: true,
            error_limit: 5,
            color: ColorMode::Never,
        }
    );
    assert!(parse(&["--debug-info"]).debug_info);
}

#[test]
fn test_invalid_values_keep_defaults() {
    let options = parse(&["--error-limit=many", "--color=sometimes", "--fast"]);
    assert_eq!(options, CompileOptions::default());
}

#[test]
fn test_later_flag_wins() {
    let options = parse(&["--color=always", "--color=never"]);
    assert_eq!(options.color, ColorMode::Never);
}

#[test]
fn test_derived_configs() {
    let options = parse(&["-g", "--error-limit=3"]);
    assert_eq!(options.diagnostic_config().error_limit, 3);
    assert!(options.diagnostic_config().deduplicate);
    assert!(options.codegen_options().debug_info);
}
