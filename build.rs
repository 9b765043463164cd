fn main() {
    lalrpop::Configuration::new()
        .use_cargo_dir_conventions()
        .process()
        .expect("failed to process lalrpop grammar");

    println!("cargo:rerun-if-changed=src/grammar.lalrpop");
}
