mod compiler;

pub use compiler::{compile_voice_prompt, generic_voice_prompt};
