//! Object type extraction and deterministic badge colors

use egui::Color32;

/// Badge palette, indexed by [`color_index`]
pub const TYPE_PALETTE: [(&str, Color32); 28] = [
    ("Bright Red", Color32::from_rgb(0xe7, 0x4c, 0x3c)),
    ("Sky Blue", Color32::from_rgb(0x34, 0x98, 0xdb)),
    ("Emerald Green", Color32::from_rgb(0x2e, 0xcc, 0x71)),
    ("Orange", Color32::from_rgb(0xf3, 0x9c, 0x12)),
    ("Amethyst Purple", Color32::from_rgb(0x9b, 0x59, 0xb6)),
    ("Turquoise", Color32::from_rgb(0x1a, 0xbc, 0x9c)),
    ("Carrot Orange", Color32::from_rgb(0xe6, 0x7e, 0x22)),
    ("Wet Asphalt", Color32::from_rgb(0x34, 0x49, 0x5e)),
    ("Sun Flower Yellow", Color32::from_rgb(0xf1, 0xc4, 0x0f)),
    ("Concrete Gray", Color32::from_rgb(0x95, 0xa5, 0xa6)),
    ("Pomegranate Red", Color32::from_rgb(0xc0, 0x39, 0x2b)),
    ("Belize Blue", Color32::from_rgb(0x29, 0x80, 0xb9)),
    ("Nephritis Green", Color32::from_rgb(0x27, 0xae, 0x60)),
    ("Pumpkin Orange", Color32::from_rgb(0xd3, 0x54, 0x00)),
    ("Wisteria Purple", Color32::from_rgb(0x8e, 0x44, 0xad)),
    ("Green Sea", Color32::from_rgb(0x16, 0xa0, 0x85)),
    ("Pink", Color32::from_rgb(0xe9, 0x1e, 0x63)),
    ("Dark Turquoise", Color32::from_rgb(0x00, 0xbc, 0xd4)),
    ("Material Orange", Color32::from_rgb(0xff, 0x98, 0x00)),
    ("Deep Purple", Color32::from_rgb(0x67, 0x3a, 0xb7)),
    ("Blue Grey", Color32::from_rgb(0x60, 0x7d, 0x8b)),
    ("Brown", Color32::from_rgb(0x79, 0x55, 0x48)),
    ("Teal", Color32::from_rgb(0x00, 0x96, 0x88)),
    ("Deep Orange Red", Color32::from_rgb(0xff, 0x57, 0x22)),
    ("Material Purple", Color32::from_rgb(0x9c, 0x27, 0xb0)),
    ("Material Blue", Color32::from_rgb(0x21, 0x96, 0xf3)),
    ("Light Green", Color32::from_rgb(0x68, 0x9f, 0x38)),
    ("Amber Orange", Color32::from_rgb(0xff, 0x6f, 0x00)),
];

const GOLDEN_RATIO: f64 = 0.6180339887;
const HASH_OFFSET: i64 = 7;

/// Type of an instance name: `desk_lamp_0` → `desk_lamp`.
///
/// Without a trailing `_<digits>` suffix the text before the first `_` is
/// used, or the whole name when it has no `_`.
pub fn type_of(instance_name: &str) -> &str {
    if let Some((prefix, suffix)) = instance_name.rsplit_once('_') {
        if !prefix.is_empty()
            && !suffix.is_empty()
            && suffix.bytes().all(|b| b.is_ascii_digit())
        {
            return prefix;
        }
    }
    instance_name
        .split_once('_')
        .map_or(instance_name, |(head, _)| head)
}

/// String hash over UTF-16 code units with 32-bit shift wrapping
fn type_hash(object_type: &str) -> i64 {
    let mut hash: i64 = 0;
    let mut units: i64 = 0;
    for unit in object_type.encode_utf16() {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        hash = unit as i64 + shifted - hash;
        units += 1;
    }
    (hash + units * 31).abs()
}

/// Palette index for a type string
pub fn color_index(object_type: &str) -> usize {
    let scaled = (type_hash(object_type) + HASH_OFFSET) as f64 * GOLDEN_RATIO;
    let fraction = scaled - scaled.floor();
    let index = (fraction * TYPE_PALETTE.len() as f64).floor() as usize;
    index.min(TYPE_PALETTE.len() - 1)
}

/// Badge color for a type string
pub fn color_for(object_type: &str) -> Color32 {
    TYPE_PALETTE[color_index(object_type)].1
}

/// Predicate colors for the relations view
pub fn relation_color(predicate: &str) -> Color32 {
    match predicate {
        "is at" => Color32::from_rgb(0x00, 0x7b, 0xff),
        "face to" => Color32::from_rgb(0x28, 0xa7, 0x45),
        "left of" => Color32::from_rgb(0xff, 0xc1, 0x07),
        "right of" => Color32::from_rgb(0xfd, 0x7e, 0x14),
        "behind" => Color32::from_rgb(0x66, 0x10, 0xf2),
        "in front of" => Color32::from_rgb(0x20, 0xc9, 0x97),
        "above" => Color32::from_rgb(0xe8, 0x3e, 0x8c),
        "below" => Color32::from_rgb(0x6f, 0x42, 0xc1),
        "in" => Color32::from_rgb(0xdc, 0x35, 0x45),
        "on" => Color32::from_rgb(0x17, 0xa2, 0xb8),
        _ => Color32::from_rgb(0x6c, 0x75, 0x7d),
    }
}
