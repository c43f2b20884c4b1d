//! Tag: the `(group, element)` key naming a data element.

use core::fmt;

/// A data element tag: a 16-bit group number and a 16-bit element number.
///
/// Ordering follows the on-disk ordering of a data set: by group, then element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    /// Group number (first half of the key)
    pub group: u16,
    /// Element number within the group
    pub element: u16,
}

impl Tag {
    /// Pixel Data, the bulk payload element.
    pub const PIXEL_DATA: Tag = Tag::new(0x7FE0, 0x0010);
    /// Transfer Syntax UID in the file meta group.
    pub const TRANSFER_SYNTAX_UID: Tag = Tag::new(0x0002, 0x0010);
    /// Sequence item marker.
    pub const ITEM: Tag = Tag::new(0xFFFE, 0xE000);
    /// End of an undefined-length item.
    pub const ITEM_DELIMITATION: Tag = Tag::new(0xFFFE, 0xE00D);
    /// End of an undefined-length sequence.
    pub const SEQUENCE_DELIMITATION: Tag = Tag::new(0xFFFE, 0xE0DD);

    /// Group number of the file meta information.
    pub const META_GROUP: u16 = 0x0002;

    /// Build a tag from its two halves.
    #[must_use]
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    /// Private tags live in odd-numbered groups.
    #[must_use]
    pub const fn is_private(self) -> bool {
        self.group & 1 == 1
    }

    /// Item and delimitation markers in group `FFFE`.
    #[must_use]
    pub const fn is_delimiter(self) -> bool {
        self.group == 0xFFFE
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X}, {:04X})", self.group, self.element)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Self::new(group, element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_uppercase_hex_with_space() {
        assert_eq!(Tag::new(0x0008, 0x0005).to_string(), "(0008, 0005)");
        assert_eq!(Tag::PIXEL_DATA.to_string(), "(7FE0, 0010)");
        assert_eq!(Tag::new(0x0029, 0x10ab).to_string(), "(0029, 10AB)");
    }

    #[test]
    fn odd_groups_are_private() {
        assert!(Tag::new(0x0009, 0x1001).is_private());
        assert!(!Tag::new(0x0010, 0x0010).is_private());
    }

    #[test]
    fn item_markers_are_delimiters() {
        assert!(Tag::ITEM.is_delimiter());
        assert!(Tag::SEQUENCE_DELIMITATION.is_delimiter());
        assert!(!Tag::PIXEL_DATA.is_delimiter());
        assert_eq!(Tag::from((0x7FE0, 0x0010)), Tag::PIXEL_DATA);
    }

    #[test]
    fn ordering_is_group_then_element() {
        assert!(Tag::new(0x0008, 0xFFFF) < Tag::new(0x0010, 0x0000));
        assert!(Tag::new(0x0010, 0x0010) < Tag::new(0x0010, 0x0020));
    }
}
