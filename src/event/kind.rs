//! Modification kinds, their flag bits and the derived group unions.
//!
//! Every mutating operation that a decorated container can perform belongs to exactly one
//! [`EventKind`]. Each kind owns a single bit in a 32-bit mask ([`EventFlags`]), which lets
//! listeners subscribe to arbitrary unions of kinds. The unions used most often are provided as
//! precomputed `const` groups on [`EventFlags`] and can also be looked up by name with [`group`].
//!
//! Groups are for matching and filtering only. Two events are of the same kind when their
//! [`EventKind`] values are equal, never because their flags intersect a group.
//!
//! # Examples
//!
//! ```rust
//! use modscope::event::{name_of, EventFlags, EventKind};
//!
//! assert_eq!(EventKind::SetIndexed.flag(), 0x0001_0000);
//! assert_eq!(name_of(EventKind::AddAll.flag()), "AddAll");
//! assert_eq!(name_of(0xDEAD_0000), "Unknown");
//! assert!(EventFlags::FROM_LIST.contains(EventKind::SetIterated.flags()));
//! ```

use bitflags::bitflags;
use strum::{AsRefStr, Display, EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::container::Capabilities;

/// Name rendered for any raw flag value that is not exactly one [`EventKind`].
pub const UNKNOWN_KIND_NAME: &str = "Unknown";

/// The atomic modification kinds.
///
/// The discriminant of each variant is its flag bit, so `kind as u32 == kind.flag()`.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[repr(u32)]
pub enum EventKind {
    /// Single element added at an unspecified position.
    Add = 0x0000_0001,
    /// Single element inserted at an index.
    AddIndexed = 0x0000_0002,
    /// `n` copies of an element added (bag style).
    AddNCopies = 0x0000_0004,
    /// Element inserted through an iterator.
    AddIterated = 0x0000_0008,
    /// A batch of elements added.
    AddAll = 0x0000_0010,
    /// A batch of elements inserted at an index.
    AddAllIndexed = 0x0000_0020,
    /// Single element removed by value.
    Remove = 0x0000_0100,
    /// Element removed by index.
    RemoveIndexed = 0x0000_0200,
    /// `n` copies of an element removed (bag style).
    RemoveNCopies = 0x0000_0400,
    /// Element removed through an iterator.
    RemoveIterated = 0x0000_0800,
    /// Every element contained in a batch removed.
    RemoveAll = 0x0000_1000,
    /// Every element not contained in a batch removed.
    RetainAll = 0x0000_2000,
    /// All elements removed.
    Clear = 0x0000_4000,
    /// Element replaced at an index.
    SetIndexed = 0x0001_0000,
    /// Element replaced through an iterator.
    SetIterated = 0x0002_0000,
    /// Head element removed from a buffer.
    RemoveNext = 0x0004_0000,
}

/// How a kind may change the size of the container it is applied to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SizeEffect {
    /// The size can only stay the same or grow.
    Grows,
    /// The size can only stay the same or shrink.
    Shrinks,
    /// The size never changes.
    Preserves,
}

impl EventKind {
    /// The unique bit of this kind.
    #[must_use]
    pub const fn flag(self) -> u32 {
        self as u32
    }

    /// The bit of this kind as a single-member [`EventFlags`].
    #[must_use]
    pub const fn flags(self) -> EventFlags {
        EventFlags::from_bits_retain(self as u32)
    }

    /// Maps a raw flag back to its kind.
    ///
    /// Returns `None` unless `flag` is exactly one kind bit; group unions and unused bits do not
    /// map to a kind.
    #[must_use]
    pub fn from_flag(flag: u32) -> Option<Self> {
        EventKind::iter().find(|kind| kind.flag() == flag)
    }

    /// The fixed human-readable name of this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether this kind carries an index into the container.
    #[must_use]
    pub fn is_indexed(self) -> bool {
        EventFlags::INDEXED_GROUP.intersects(self.flags())
            || EventFlags::ITERATED_GROUP.intersects(self.flags())
    }

    /// How operations of this kind may change the size of the container.
    #[must_use]
    pub fn size_effect(self) -> SizeEffect {
        let flags = self.flags();
        if EventFlags::INCREASE_GROUP.intersects(flags) {
            SizeEffect::Grows
        } else if EventFlags::REDUCE_GROUP.intersects(flags) {
            SizeEffect::Shrinks
        } else {
            SizeEffect::Preserves
        }
    }
}

bitflags! {
    /// A union of [`EventKind`] bits, used to filter which modifications a listener sees.
    ///
    /// Besides one constant per kind, the precomputed groups below cover the common filters.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct EventFlags: u32 {
        /// See [`EventKind::Add`]
        const ADD = EventKind::Add.flag();
        /// See [`EventKind::AddIndexed`]
        const ADD_INDEXED = EventKind::AddIndexed.flag();
        /// See [`EventKind::AddNCopies`]
        const ADD_NCOPIES = EventKind::AddNCopies.flag();
        /// See [`EventKind::AddIterated`]
        const ADD_ITERATED = EventKind::AddIterated.flag();
        /// See [`EventKind::AddAll`]
        const ADD_ALL = EventKind::AddAll.flag();
        /// See [`EventKind::AddAllIndexed`]
        const ADD_ALL_INDEXED = EventKind::AddAllIndexed.flag();
        /// See [`EventKind::Remove`]
        const REMOVE = EventKind::Remove.flag();
        /// See [`EventKind::RemoveIndexed`]
        const REMOVE_INDEXED = EventKind::RemoveIndexed.flag();
        /// See [`EventKind::RemoveNCopies`]
        const REMOVE_NCOPIES = EventKind::RemoveNCopies.flag();
        /// See [`EventKind::RemoveIterated`]
        const REMOVE_ITERATED = EventKind::RemoveIterated.flag();
        /// See [`EventKind::RemoveAll`]
        const REMOVE_ALL = EventKind::RemoveAll.flag();
        /// See [`EventKind::RetainAll`]
        const RETAIN_ALL = EventKind::RetainAll.flag();
        /// See [`EventKind::Clear`]
        const CLEAR = EventKind::Clear.flag();
        /// See [`EventKind::SetIndexed`]
        const SET_INDEXED = EventKind::SetIndexed.flag();
        /// See [`EventKind::SetIterated`]
        const SET_ITERATED = EventKind::SetIterated.flag();
        /// See [`EventKind::RemoveNext`]
        const REMOVE_NEXT = EventKind::RemoveNext.flag();

        /// Every kind that adds elements
        const ADD_GROUP = Self::ADD.bits()
            | Self::ADD_INDEXED.bits()
            | Self::ADD_NCOPIES.bits()
            | Self::ADD_ITERATED.bits()
            | Self::ADD_ALL.bits()
            | Self::ADD_ALL_INDEXED.bits();
        /// Every kind that removes selected elements
        const REMOVE_GROUP = Self::REMOVE.bits()
            | Self::REMOVE_INDEXED.bits()
            | Self::REMOVE_NCOPIES.bits()
            | Self::REMOVE_ITERATED.bits()
            | Self::REMOVE_ALL.bits()
            | Self::REMOVE_NEXT.bits();
        /// Retain operations
        const RETAIN_GROUP = Self::RETAIN_ALL.bits();
        /// Clear operations
        const CLEAR_GROUP = Self::CLEAR.bits();
        /// Every kind that replaces an element in place
        const SET_GROUP = Self::SET_INDEXED.bits() | Self::SET_ITERATED.bits();
        /// Every kind addressed by an explicit index
        const INDEXED_GROUP = Self::ADD_INDEXED.bits()
            | Self::ADD_ALL_INDEXED.bits()
            | Self::REMOVE_INDEXED.bits()
            | Self::SET_INDEXED.bits();
        /// Every kind raised through an iterator
        const ITERATED_GROUP = Self::ADD_ITERATED.bits()
            | Self::REMOVE_ITERATED.bits()
            | Self::SET_ITERATED.bits();
        /// Every kind carrying a repeat count
        const NCOPIES_GROUP = Self::ADD_NCOPIES.bits() | Self::REMOVE_NCOPIES.bits();
        /// Every kind that can grow the size
        const INCREASE_GROUP = Self::ADD_GROUP.bits();
        /// Every kind that can shrink the size
        const REDUCE_GROUP = Self::REMOVE_GROUP.bits()
            | Self::RETAIN_GROUP.bits()
            | Self::CLEAR_GROUP.bits();
        /// Every kind
        const CHANGE_GROUP = Self::INCREASE_GROUP.bits()
            | Self::REDUCE_GROUP.bits()
            | Self::SET_GROUP.bits();

        /// Kinds a plain collection can raise
        const FROM_COLLECTION = Self::ADD.bits()
            | Self::ADD_ALL.bits()
            | Self::REMOVE.bits()
            | Self::REMOVE_ALL.bits()
            | Self::RETAIN_ALL.bits()
            | Self::CLEAR.bits()
            | Self::REMOVE_ITERATED.bits();
        /// Kinds a set can raise
        const FROM_SET = Self::FROM_COLLECTION.bits();
        /// Kinds a sorted set (and its views) can raise
        const FROM_SORTED_SET = Self::FROM_SET.bits();
        /// Kinds a list can raise
        const FROM_LIST = Self::FROM_COLLECTION.bits()
            | Self::ADD_INDEXED.bits()
            | Self::ADD_ALL_INDEXED.bits()
            | Self::REMOVE_INDEXED.bits()
            | Self::SET_INDEXED.bits()
            | Self::ADD_ITERATED.bits()
            | Self::SET_ITERATED.bits();
        /// Kinds a bag can raise
        const FROM_BAG = Self::FROM_COLLECTION.bits() | Self::NCOPIES_GROUP.bits();
        /// Kinds a buffer can raise
        const FROM_BUFFER = Self::FROM_COLLECTION.bits() | Self::REMOVE_NEXT.bits();
    }
}

impl EventFlags {
    /// Whether `kind` is part of this mask.
    #[must_use]
    pub fn matches(self, kind: EventKind) -> bool {
        self.intersects(kind.flags())
    }

    /// The kinds a container with the given capabilities is able to raise.
    #[must_use]
    pub fn for_capabilities(capabilities: Capabilities) -> Self {
        let mut flags = EventFlags::empty();
        if capabilities.contains(Capabilities::COLLECTION) {
            flags |= EventFlags::FROM_COLLECTION;
        }
        if capabilities.contains(Capabilities::SET) {
            flags |= EventFlags::FROM_SET;
        }
        if capabilities.contains(Capabilities::SORTED_SET) {
            flags |= EventFlags::FROM_SORTED_SET;
        }
        if capabilities.contains(Capabilities::LIST) {
            flags |= EventFlags::FROM_LIST;
        }
        if capabilities.contains(Capabilities::BAG) {
            flags |= EventFlags::FROM_BAG;
        }
        if capabilities.contains(Capabilities::BUFFER) {
            flags |= EventFlags::FROM_BUFFER;
        }
        flags
    }

    /// The individual kinds contained in this mask, in flag order.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::iter().filter(move |kind| self.matches(*kind))
    }
}

impl From<EventKind> for EventFlags {
    fn from(kind: EventKind) -> Self {
        kind.flags()
    }
}

/// Renders a raw flag value as the name of its kind.
///
/// Anything that is not exactly one kind bit, including group unions and `0`, renders as
/// [`UNKNOWN_KIND_NAME`]. This never fails.
#[must_use]
pub fn name_of(flag: u32) -> &'static str {
    EventKind::from_flag(flag).map_or(UNKNOWN_KIND_NAME, EventKind::name)
}

/// Looks up a precomputed group by name.
///
/// Names are the upper-case constant names of [`EventFlags`] with or without the `_GROUP`
/// suffix (`"ADD"` and `"ADD_GROUP"` both resolve to [`EventFlags::ADD_GROUP`]); the
/// capability filters are named `FROM_*`. Unknown names return an empty mask, which matches
/// nothing.
#[must_use]
pub fn group(name: &str) -> EventFlags {
    match name.strip_suffix("_GROUP").unwrap_or(name) {
        "ADD" => EventFlags::ADD_GROUP,
        "REMOVE" => EventFlags::REMOVE_GROUP,
        "RETAIN" => EventFlags::RETAIN_GROUP,
        "CLEAR" => EventFlags::CLEAR_GROUP,
        "SET" => EventFlags::SET_GROUP,
        "INDEXED" => EventFlags::INDEXED_GROUP,
        "ITERATED" => EventFlags::ITERATED_GROUP,
        "NCOPIES" => EventFlags::NCOPIES_GROUP,
        "INCREASE" => EventFlags::INCREASE_GROUP,
        "REDUCE" => EventFlags::REDUCE_GROUP,
        "CHANGE" => EventFlags::CHANGE_GROUP,
        "FROM_COLLECTION" => EventFlags::FROM_COLLECTION,
        "FROM_SET" => EventFlags::FROM_SET,
        "FROM_SORTED_SET" => EventFlags::FROM_SORTED_SET,
        "FROM_LIST" => EventFlags::FROM_LIST,
        "FROM_BAG" => EventFlags::FROM_BAG,
        "FROM_BUFFER" => EventFlags::FROM_BUFFER,
        _ => EventFlags::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [(EventKind, &str); 16] = [
        (EventKind::Add, "Add"),
        (EventKind::AddIndexed, "AddIndexed"),
        (EventKind::AddNCopies, "AddNCopies"),
        (EventKind::AddIterated, "AddIterated"),
        (EventKind::AddAll, "AddAll"),
        (EventKind::AddAllIndexed, "AddAllIndexed"),
        (EventKind::Remove, "Remove"),
        (EventKind::RemoveIndexed, "RemoveIndexed"),
        (EventKind::RemoveNCopies, "RemoveNCopies"),
        (EventKind::RemoveIterated, "RemoveIterated"),
        (EventKind::RemoveAll, "RemoveAll"),
        (EventKind::RetainAll, "RetainAll"),
        (EventKind::Clear, "Clear"),
        (EventKind::SetIndexed, "SetIndexed"),
        (EventKind::SetIterated, "SetIterated"),
        (EventKind::RemoveNext, "RemoveNext"),
    ];

    #[test]
    fn test_names_round_trip_through_flags() {
        assert_eq!(EventKind::COUNT, CANONICAL.len());
        for (kind, name) in CANONICAL {
            assert_eq!(name_of(kind.flag()), name);
            assert_eq!(kind.to_string(), name);
            assert_eq!(EventKind::from_flag(kind.flag()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_flags() {
        assert_eq!(name_of(0), UNKNOWN_KIND_NAME);
        assert_eq!(name_of(0x8000_0000), UNKNOWN_KIND_NAME);
        assert_eq!(name_of(EventFlags::ADD_GROUP.bits()), UNKNOWN_KIND_NAME);
        assert_eq!(EventKind::from_flag(0x0000_0003), None);
    }

    #[test]
    fn test_flags_are_disjoint_single_bits() {
        let mut seen = 0u32;
        for kind in EventKind::iter() {
            assert_eq!(kind.flag().count_ones(), 1, "{kind} is not a single bit");
            assert_eq!(seen & kind.flag(), 0, "{kind} overlaps another kind");
            seen |= kind.flag();
        }
        assert_eq!(seen, EventFlags::CHANGE_GROUP.bits());
    }

    #[test]
    fn test_group_unions() {
        assert_eq!(EventFlags::ADD_GROUP.kinds().count(), 6);
        assert!(EventFlags::REDUCE_GROUP.matches(EventKind::Clear));
        assert!(EventFlags::REDUCE_GROUP.matches(EventKind::RetainAll));
        assert!(!EventFlags::REDUCE_GROUP.matches(EventKind::SetIndexed));
        assert!(EventFlags::FROM_BUFFER.matches(EventKind::RemoveNext));
        assert!(!EventFlags::FROM_LIST.matches(EventKind::RemoveNext));
        assert!(EventFlags::FROM_BAG.matches(EventKind::AddNCopies));
        assert!(!EventFlags::FROM_COLLECTION.matches(EventKind::AddIndexed));
        assert_eq!(
            EventFlags::CHANGE_GROUP,
            EventFlags::ADD_GROUP
                | EventFlags::REMOVE_GROUP
                | EventFlags::RETAIN_GROUP
                | EventFlags::CLEAR_GROUP
                | EventFlags::SET_GROUP
        );
    }

    #[test]
    fn test_group_lookup_by_name() {
        assert_eq!(group("ADD"), EventFlags::ADD_GROUP);
        assert_eq!(group("ADD_GROUP"), EventFlags::ADD_GROUP);
        assert_eq!(group("FROM_LIST"), EventFlags::FROM_LIST);
        assert_eq!(group("nonsense"), EventFlags::empty());
        assert!(!group("nonsense").matches(EventKind::Add));
    }

    #[test]
    fn test_size_effect() {
        assert_eq!(EventKind::AddAll.size_effect(), SizeEffect::Grows);
        assert_eq!(EventKind::RemoveNext.size_effect(), SizeEffect::Shrinks);
        assert_eq!(EventKind::SetIterated.size_effect(), SizeEffect::Preserves);
        assert!(EventKind::SetIterated.is_indexed());
        assert!(!EventKind::Add.is_indexed());
    }

    #[test]
    fn test_capability_kinds() {
        let list = EventFlags::for_capabilities(Capabilities::COLLECTION | Capabilities::LIST);
        assert_eq!(list, EventFlags::FROM_LIST);
        let buffer = EventFlags::for_capabilities(Capabilities::COLLECTION | Capabilities::BUFFER);
        assert_eq!(buffer, EventFlags::FROM_BUFFER);
        assert_eq!(
            EventFlags::for_capabilities(Capabilities::empty()),
            EventFlags::empty()
        );
    }
}
