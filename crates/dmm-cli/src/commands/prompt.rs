//! `datamesh-manager-mcp prompt` - print the workflow prompt.

use dmm_mcp::prompts::builtin_prompts;

/// Print every registered prompt with its name as a heading.
pub fn print() {
    for prompt in builtin_prompts() {
        println!("# {}\n", prompt.name);
        println!("{}", prompt.text.trim());
    }
}
