//! Test fixtures - Lua source snippets for testing

/// Entry file requiring a single `util` module
pub fn main_requiring_util() -> &'static str {
    r#"require("util")
-- entry point
print(greet("world"))
"#
}

/// Module with a global function and a comment-only line
pub fn util_module() -> &'static str {
    r#"-- util helpers
function greet(name)
    return "hello " .. name
end
"#
}

/// Module that pulls in a nested dependency with single quotes
pub fn module_with_nested_require() -> &'static str {
    r#"require('lib.strings')

function shout(s)
    return upper(s) -- loud
end
"#
}

/// Leaf module living at `lib/strings.lua`
pub fn nested_strings_module() -> &'static str {
    r#"function upper(s)
    return string.upper(s)
end
"#
}
