//! This module implements library linking for contract bytecode.
//!
//! Unlinked bytecode produced by the Solidity compiler contains placeholders
//! for the addresses of external libraries. A placeholder is made of two
//! leading underscores, the library name and a run of trailing underscores
//! padding it to the compiler's token width, for example
//! `__SafeMath______________________________`. Linking replaces every such
//! token with the hex digits of the library's address.

use crate::errors::{BytecodeError, LinkError};
use serde::de::{Error as DeError, Unexpected};
use serde::{Deserialize, Deserializer};

/// Replaces the placeholders of every named library in `bytecode` with its
/// address.
///
/// Libraries are linked in iteration order. The address may be given with
/// or without a `0x` prefix and its hex digits are always written in lower
/// case. A placeholder needs at least one trailing underscore after the
/// library name and consumes the entire underscore run that follows it, so
/// placeholders of any width are supported. Library names that are a prefix
/// of another linked library's name are not supported.
pub fn link_bytecode<I, S, A>(bytecode: &str, links: I) -> String
where
    I: IntoIterator<Item = (S, A)>,
    S: AsRef<str>,
    A: AsRef<str>,
{
    let mut code = bytecode.to_owned();
    for (name, address) in links {
        code = replace_placeholders(&code, name.as_ref(), address.as_ref());
    }
    code
}

fn replace_placeholders(code: &str, name: &str, address: &str) -> String {
    let address = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address)
        .to_ascii_lowercase();
    let pattern = format!("__{}", name);

    let mut linked = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(start) = rest.find(&pattern) {
        let after = &rest[start + pattern.len()..];
        let padding = after.len() - after.trim_start_matches('_').len();

        linked.push_str(&rest[..start]);
        if padding == 0 {
            linked.push_str(&pattern);
        } else {
            linked.push_str(&address);
        }
        rest = &after[padding..];
    }
    linked.push_str(rest);

    linked
}

/// Returns true for characters that may appear in a placeholder's library
/// name. Solidity 0.5+ uses `$<hash>$` names, so `$` is accepted as well.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$'
}

/// Finds the next placeholder in `code`, returning its byte range and the
/// library name.
fn next_placeholder(code: &str) -> Option<(usize, usize, &str)> {
    let mut offset = 0;
    while let Some(found) = code[offset..].find("__") {
        let start = offset + found;
        let body = &code[start + 2..];
        let name_len = body.len() - body.trim_start_matches(is_name_char).len();
        let tail = &body[name_len..];
        let padding = tail.len() - tail.trim_start_matches('_').len();

        if name_len > 0 && padding > 0 {
            let end = start + 2 + name_len + padding;
            return Some((start, end, &body[..name_len]));
        }
        offset = start + 1;
    }
    None
}

/// Lazily evaluated contract bytecode which may still contain library
/// placeholders.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bytecode(String);

impl Bytecode {
    /// Creates bytecode from its hex string representation. A leading `0x` is
    /// accepted and stripped.
    pub fn from_hex_str(s: &str) -> Self {
        let code = s.strip_prefix("0x").unwrap_or(s);
        Bytecode(code.to_owned())
    }

    /// Returns the hex string representation without a `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the bytecode is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Links the given libraries into a new copy of this bytecode. See
    /// [`link_bytecode`] for the placeholder rules.
    pub fn link<I, S, A>(&self, links: I) -> Bytecode
    where
        I: IntoIterator<Item = (S, A)>,
        S: AsRef<str>,
        A: AsRef<str>,
    {
        Bytecode(link_bytecode(&self.0, links))
    }

    /// Returns an iterator over the names of the libraries that still need
    /// to be linked. A library is yielded once per placeholder.
    pub fn undefined_libraries(&self) -> UndefinedLibraries<'_> {
        UndefinedLibraries { rest: &self.0 }
    }

    /// Converts fully linked bytecode into its binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LinkError> {
        if let Some(name) = self.undefined_libraries().next() {
            return Err(LinkError::UndefinedLibrary(name.to_owned()));
        }

        hex::decode(&self.0).map_err(|err| {
            LinkError::Bytecode(match err {
                hex::FromHexError::InvalidHexCharacter { c, .. } => {
                    BytecodeError::InvalidHexDigit(c)
                }
                _ => BytecodeError::InvalidLength,
            })
        })
    }
}

/// Iterator over the unresolved library names of a [`Bytecode`].
#[derive(Clone, Debug)]
pub struct UndefinedLibraries<'a> {
    rest: &'a str,
}

impl<'a> Iterator for UndefinedLibraries<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, end, name) = next_placeholder(self.rest)?;
        self.rest = &self.rest[end..];
        Some(name)
    }
}

impl<'de> Deserialize<'de> for Bytecode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        let bytecode = Bytecode::from_hex_str(&code);
        if bytecode
            .0
            .chars()
            .any(|c| !(c.is_ascii_hexdigit() || c == '_' || is_name_char(c)))
        {
            return Err(D::Error::invalid_value(
                Unexpected::Str(&code),
                &"a hex string with library placeholders",
            ));
        }
        Ok(bytecode)
    }
}
