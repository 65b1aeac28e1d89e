use std::process;

fn main() {
    let env = env_logger::Env::default().default_filter_or("mule_preview_extractor=warn");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();

    let exit_code = mule_preview_extractor::run(std::env::args_os().skip(1));
    process::exit(exit_code);
}
