//! Capability flags and limits of the Manta directory model
//!
//! Manta has no buckets. Directories play that role, so nested buckets are not
//! announced, objects cannot live at the root, and visibility comes from
//! living under `/<login>/public`.

use mb_core::{Capabilities, NameRules};

/// Maximum number of entries in one directory
pub const MAX_OBJECTS_PER_DIRECTORY: u32 = 1_000_000;

/// Characters refused in directory and object names
pub const DENIED_NAME_CHARS: [char; 3] = ['-', '.', '\\'];

/// What Manta calls a bucket
pub const BUCKET_TERM: &str = "directory";

/// What Manta calls an object
pub const OBJECT_TERM: &str = "object";

/// Capabilities of a Manta store
pub fn capabilities() -> Capabilities {
    Capabilities {
        allows_nested_buckets: false,
        allows_root_objects: false,
        allows_public_sharing: true,
        // Manta documents no limit on directories or object size
        max_buckets: u32::MAX,
        max_object_size: u64::MAX,
        max_objects_per_bucket: MAX_OBJECTS_PER_DIRECTORY,
        bucket_term: BUCKET_TERM,
        object_term: OBJECT_TERM,
    }
}

/// Naming rules shared by directories and objects.
///
/// The character list may be incomplete.
pub fn name_rules() -> NameRules {
    NameRules {
        min_chars: 1,
        max_chars: u32::MAX,
        allow_alpha: true,
        allow_numbers: true,
        case_insensitive: false,
        denied_chars: DENIED_NAME_CHARS.to_vec(),
    }
}
