//! Chapter classification and volume segmentation.
//!
//! Walks the ordered navigation fragments once, bucketing chapter numbers
//! under the volume most recently seen. Volume 0 is the implicit bucket:
//! chapters encountered before any volume heading, or all chapters when
//! volume detection is disabled.

use crate::numeral::convert;
use crate::pattern::Matchers;

/// A recognized chapter label.
#[derive(Debug, Clone)]
pub struct ChapterEntry {
    /// The raw numeral token as matched.
    pub token: String,
    /// The resolved integer value.
    pub number: u32,
    /// The full source fragment.
    pub label: String,
}

/// An explicit volume, or the implicit bucket 0.
#[derive(Debug, Clone)]
pub struct VolumeBucket {
    pub number: u32,
    /// Chapters in encounter order.
    pub chapters: Vec<ChapterEntry>,
}

/// The result of one classification pass.
#[derive(Debug, Default)]
pub struct Classified {
    /// Buckets in encounter order; numbers are unique within one pass.
    pub volumes: Vec<VolumeBucket>,
    /// Every chapter number in encounter order, regardless of bucket.
    pub flat_order: Vec<u32>,
}

/// Where chapters are currently being routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VolumeCursor {
    /// Volume detection is on but no heading has been seen yet; chapters go
    /// to bucket 0.
    Unassigned,
    Volume(u32),
}

/// Bucket chapter numbers under volumes in a single linear pass.
///
/// A fragment matching the volume pattern switches the cursor and is never
/// also tested as a chapter. A volume match whose capture group did not
/// participate is skipped without aborting the pass.
pub fn classify(fragments: &[String], matchers: &Matchers) -> Classified {
    let mut out = Classified::default();

    let mut cursor = if matchers.volume.is_some() {
        VolumeCursor::Unassigned
    } else {
        out.volumes.push(VolumeBucket {
            number: 0,
            chapters: Vec::new(),
        });
        VolumeCursor::Volume(0)
    };

    for fragment in fragments {
        if let Some(vol_re) = &matchers.volume
            && let Some(caps) = vol_re.captures(fragment)
        {
            let number = if vol_re.captures_len() > 1 {
                caps.get(1).map(|m| convert(m.as_str()))
            } else {
                // Groupless pattern: synthetic sequential numbering
                Some(out.volumes.len() as u32 + 1)
            };
            if let Some(number) = number {
                cursor = VolumeCursor::Volume(number);
                ensure_bucket(&mut out.volumes, number);
                continue;
            }
            // No usable group: fall through to the chapter matcher
        }

        if let Some(caps) = matchers.chapter.captures(fragment) {
            let Some(m) = caps.get(1) else { continue };
            let number = convert(m.as_str());
            out.flat_order.push(number);

            let bucket_number = match cursor {
                VolumeCursor::Unassigned => 0,
                VolumeCursor::Volume(n) => n,
            };
            ensure_bucket(&mut out.volumes, bucket_number)
                .chapters
                .push(ChapterEntry {
                    token: m.as_str().to_string(),
                    number,
                    label: fragment.clone(),
                });
        }
    }

    out
}

fn ensure_bucket(volumes: &mut Vec<VolumeBucket>, number: u32) -> &mut VolumeBucket {
    let idx = match volumes.iter().position(|v| v.number == number) {
        Some(idx) => idx,
        None => {
            volumes.push(VolumeBucket {
                number,
                chapters: Vec::new(),
            });
            volumes.len() - 1
        }
    };
    &mut volumes[idx]
}

/// Partition a flat chapter stream into segments at numbering resets.
///
/// A new segment starts whenever the current number is strictly less than
/// its predecessor. Streaming linear scan; the input is never sorted.
pub fn split_by_reset(numbers: &[u32]) -> Vec<Vec<u32>> {
    let mut segments = Vec::new();
    let mut current: Vec<u32> = Vec::new();

    for &n in numbers {
        if let Some(&prev) = current.last()
            && n < prev
        {
            segments.push(std::mem::take(&mut current));
        }
        current.push(n);
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
