// Exit-key names and their Win32 virtual-key codes

use std::fmt;

/// A Win32 virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u32);

impl VirtualKey {
    pub const BACKSPACE: VirtualKey = VirtualKey(0x08);
    pub const TAB: VirtualKey = VirtualKey(0x09);
    pub const ENTER: VirtualKey = VirtualKey(0x0D);
    pub const PAUSE: VirtualKey = VirtualKey(0x13);
    pub const ESCAPE: VirtualKey = VirtualKey(0x1B);
    pub const SPACE: VirtualKey = VirtualKey(0x20);
    pub const END: VirtualKey = VirtualKey(0x23);
    pub const HOME: VirtualKey = VirtualKey(0x24);
    pub const INSERT: VirtualKey = VirtualKey(0x2D);
    pub const DELETE: VirtualKey = VirtualKey(0x2E);
    pub const F1: VirtualKey = VirtualKey(0x70);
    pub const SCROLL_LOCK: VirtualKey = VirtualKey(0x91);

    /// Parse a key name such as `"Escape"`, `"F12"` or `"Q"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<VirtualKey> {
        let name = name.trim();
        let upper = name.to_ascii_uppercase();

        let named = match upper.as_str() {
            "ESC" | "ESCAPE" => Some(Self::ESCAPE),
            "PAUSE" | "BREAK" => Some(Self::PAUSE),
            "END" => Some(Self::END),
            "HOME" => Some(Self::HOME),
            "INS" | "INSERT" => Some(Self::INSERT),
            "DEL" | "DELETE" => Some(Self::DELETE),
            "SPACE" => Some(Self::SPACE),
            "ENTER" | "RETURN" => Some(Self::ENTER),
            "TAB" => Some(Self::TAB),
            "BACKSPACE" => Some(Self::BACKSPACE),
            "SCROLLLOCK" => Some(Self::SCROLL_LOCK),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        // F1..F24 are contiguous starting at 0x70
        if let Some(num) = upper.strip_prefix('F') {
            if let Ok(n) = num.parse::<u32>() {
                if (1..=24).contains(&n) {
                    return Some(VirtualKey(Self::F1.0 + n - 1));
                }
            }
            if !num.is_empty() {
                return None;
            }
        }

        // Letters and digits share their ASCII uppercase code
        let mut chars = upper.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() || c.is_ascii_digit() => {
                Some(VirtualKey(c as u32))
            }
            _ => None,
        }
    }
}

impl Default for VirtualKey {
    fn default() -> Self {
        Self::ESCAPE
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ESCAPE => write!(f, "Escape"),
            Self::PAUSE => write!(f, "Pause"),
            Self::END => write!(f, "End"),
            Self::HOME => write!(f, "Home"),
            Self::INSERT => write!(f, "Insert"),
            Self::DELETE => write!(f, "Delete"),
            Self::SPACE => write!(f, "Space"),
            Self::ENTER => write!(f, "Enter"),
            Self::TAB => write!(f, "Tab"),
            Self::BACKSPACE => write!(f, "Backspace"),
            Self::SCROLL_LOCK => write!(f, "ScrollLock"),
            VirtualKey(code) if (0x70..0x70 + 24).contains(&code) => {
                write!(f, "F{}", code - 0x70 + 1)
            }
            VirtualKey(code) if (0x30..=0x39).contains(&code) || (0x41..=0x5A).contains(&code) => {
                write!(f, "{}", code as u8 as char)
            }
            VirtualKey(code) => write!(f, "VK 0x{code:02X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_aliases_parse() {
        assert_eq!(VirtualKey::from_name("Escape"), Some(VirtualKey::ESCAPE));
        assert_eq!(VirtualKey::from_name("esc"), Some(VirtualKey::ESCAPE));
        assert_eq!(VirtualKey::from_name("  ESCAPE "), Some(VirtualKey::ESCAPE));
    }

    #[test]
    fn function_keys_parse_within_range() {
        assert_eq!(VirtualKey::from_name("F1"), Some(VirtualKey(0x70)));
        assert_eq!(VirtualKey::from_name("f12"), Some(VirtualKey(0x7B)));
        assert_eq!(VirtualKey::from_name("F24"), Some(VirtualKey(0x87)));
        assert_eq!(VirtualKey::from_name("F0"), None);
        assert_eq!(VirtualKey::from_name("F25"), None);
    }

    #[test]
    fn letters_and_digits_parse() {
        assert_eq!(VirtualKey::from_name("q"), Some(VirtualKey(0x51)));
        assert_eq!(VirtualKey::from_name("7"), Some(VirtualKey(0x37)));
        // a lone "F" is the letter, not a function key
        assert_eq!(VirtualKey::from_name("F"), Some(VirtualKey(0x46)));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(VirtualKey::from_name(""), None);
        assert_eq!(VirtualKey::from_name("Hyper"), None);
        assert_eq!(VirtualKey::from_name("!"), None);
    }

    #[test]
    fn display_names_match_parser() {
        for name in ["Escape", "Pause", "F5", "Q", "0", "ScrollLock"] {
            let key = VirtualKey::from_name(name).unwrap();
            assert_eq!(key.to_string(), name);
        }
        assert_eq!(VirtualKey(0xFF).to_string(), "VK 0xFF");
    }
}
