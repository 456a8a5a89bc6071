//! Dirty aggregator - whether the workflow as a whole has unsaved changes
//!
//! Nothing is cached: every call reads the current flags of the slices passed in.

use super::Dirtyable;

pub fn is_workflow_dirty<'a>(slices: impl IntoIterator<Item = &'a dyn Dirtyable>) -> bool {
    slices.into_iter().any(|slice| slice.is_dirty())
}

/// Keys of the slices holding unsaved changes, in registry order
pub fn dirty_slices<'a>(slices: impl IntoIterator<Item = &'a dyn Dirtyable>) -> Vec<&'static str> {
    slices
        .into_iter()
        .filter(|slice| slice.is_dirty())
        .map(|slice| slice.key())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::StorageError;

    struct Flag {
        key: &'static str,
        dirty: bool,
    }

    impl Dirtyable for Flag {
        fn key(&self) -> &'static str {
            self.key
        }
        fn is_dirty(&self) -> bool {
            self.dirty
        }
        fn mark_clean(&mut self) {
            self.dirty = false;
        }
        fn reset(&mut self) -> Result<(), StorageError> {
            self.dirty = false;
            Ok(())
        }
        fn revision(&self) -> u64 {
            0
        }
        fn can_continue(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_dirty_iff_any_slice_dirty() {
        // Every combination of three flags
        for bits in 0u8..8 {
            let flags: Vec<Flag> = ["a", "b", "c"]
                .into_iter()
                .enumerate()
                .map(|(i, key)| Flag {
                    key,
                    dirty: bits & (1 << i) != 0,
                })
                .collect();
            let dirty = is_workflow_dirty(flags.iter().map(|f| f as &dyn Dirtyable));
            assert_eq!(dirty, bits != 0, "bits {:03b}", bits);
            assert_eq!(
                dirty_slices(flags.iter().map(|f| f as &dyn Dirtyable)).len(),
                bits.count_ones() as usize
            );
        }
    }

    #[test]
    fn test_empty_registry_is_clean() {
        assert!(!is_workflow_dirty(std::iter::empty()));
    }
}
