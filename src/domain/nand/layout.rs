//! Page layout: an ordered description of what lives at each byte offset
//! of a physical page (main data, spare/OOB data, ECC parity, bad-block
//! markers, or padding).

/// What a layout entry's bytes are used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEntryType {
    /// Padding with no defined meaning.
    Unused,
    /// Main data area visible to the FTL.
    Data,
    /// Spare-area bytes reserved for filesystem/ECC metadata, but
    /// user-accessible through OOB reads/writes.
    OobData,
    /// Spare-area bytes free for arbitrary use (not touched by ECC or
    /// bad-block marking).
    OobFree,
    /// On-die ECC parity bytes.
    EccParity,
    /// Bad block marker bytes.
    Marker,
}

/// One contiguous run of `byte_count` bytes of type `entry_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub entry_type: LayoutEntryType,
    pub byte_count: u32,
}

/// An ordered page layout: walking `entries` in order and summing
/// `byte_count` reconstructs the full (page + OOB) byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub entries: Vec<LayoutEntry>,
}

impl PageLayout {
    pub fn new(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    pub fn total_bytes(&self) -> u32 {
        self.entries.iter().map(|e| e.byte_count).sum()
    }

    /// Byte ranges (start, end) for every entry of the given type, in
    /// layout order.
    pub fn ranges_of(&self, entry_type: LayoutEntryType) -> Vec<(u32, u32)> {
        let mut offset = 0u32;
        let mut ranges = Vec::new();
        for entry in &self.entries {
            if entry.entry_type == entry_type {
                ranges.push((offset, offset + entry.byte_count));
            }
            offset += entry.byte_count;
        }
        ranges
    }

    pub fn data_bytes(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.entry_type == LayoutEntryType::Data)
            .map(|e| e.byte_count)
            .sum()
    }

    pub fn oob_bytes(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.entry_type,
                    LayoutEntryType::OobData | LayoutEntryType::OobFree | LayoutEntryType::Marker
                )
            })
            .map(|e| e.byte_count)
            .sum()
    }

    /// A typical layout: `page_size` bytes of data followed by
    /// `oob_size` bytes split into ECC parity (`ecc_bytes`) and free OOB.
    pub fn simple(page_size: u32, oob_size: u32, ecc_bytes: u32) -> Self {
        let mut entries = vec![LayoutEntry {
            entry_type: LayoutEntryType::Data,
            byte_count: page_size,
        }];
        let marker_bytes = 2u32.min(oob_size);
        let remaining_oob = oob_size.saturating_sub(marker_bytes + ecc_bytes);
        if marker_bytes > 0 {
            entries.push(LayoutEntry {
                entry_type: LayoutEntryType::Marker,
                byte_count: marker_bytes,
            });
        }
        if remaining_oob > 0 {
            entries.push(LayoutEntry {
                entry_type: LayoutEntryType::OobFree,
                byte_count: remaining_oob,
            });
        }
        if ecc_bytes > 0 {
            entries.push(LayoutEntry {
                entry_type: LayoutEntryType::EccParity,
                byte_count: ecc_bytes,
            });
        }
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_layout_totals_page_plus_oob() {
        let layout = PageLayout::simple(2048, 64, 32);
        assert_eq!(layout.total_bytes(), 2048 + 64);
        assert_eq!(layout.data_bytes(), 2048);
        assert_eq!(layout.oob_bytes(), 64);
    }

    #[test]
    fn ranges_of_marker_is_at_page_boundary() {
        let layout = PageLayout::simple(2048, 64, 32);
        let ranges = layout.ranges_of(LayoutEntryType::Marker);
        assert_eq!(ranges, vec![(2048, 2050)]);
    }
}
