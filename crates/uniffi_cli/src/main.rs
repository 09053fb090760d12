//! Generates the tagkit bindings: Kotlin when any argument mentions kotlin, Swift otherwise

use std::env;

fn wants_kotlin(mut args: impl Iterator<Item = String>) -> bool {
    args.any(|arg| arg.to_lowercase().contains("kotlin"))
}

fn main() {
    if wants_kotlin(env::args()) {
        uniffi::uniffi_bindgen_main();
    } else {
        uniffi::uniffi_bindgen_swift();
    }
}
