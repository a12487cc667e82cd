use std::collections::HashMap;
use std::sync::LazyLock;

/// Exhaustive table of the composed numerals 一..一百 as they appear in the
/// corpora. The corpora compose irregularly, so the table enumerates every
/// value instead of deriving them arithmetically.
const CHINESE_NUMBERS: [(&str, u32); 100] = [
    ("一", 1),
    ("二", 2),
    ("三", 3),
    ("四", 4),
    ("五", 5),
    ("六", 6),
    ("七", 7),
    ("八", 8),
    ("九", 9),
    ("十", 10),
    ("十一", 11),
    ("十二", 12),
    ("十三", 13),
    ("十四", 14),
    ("十五", 15),
    ("十六", 16),
    ("十七", 17),
    ("十八", 18),
    ("十九", 19),
    ("二十", 20),
    ("二十一", 21),
    ("二十二", 22),
    ("二十三", 23),
    ("二十四", 24),
    ("二十五", 25),
    ("二十六", 26),
    ("二十七", 27),
    ("二十八", 28),
    ("二十九", 29),
    ("三十", 30),
    ("三十一", 31),
    ("三十二", 32),
    ("三十三", 33),
    ("三十四", 34),
    ("三十五", 35),
    ("三十六", 36),
    ("三十七", 37),
    ("三十八", 38),
    ("三十九", 39),
    ("四十", 40),
    ("四十一", 41),
    ("四十二", 42),
    ("四十三", 43),
    ("四十四", 44),
    ("四十五", 45),
    ("四十六", 46),
    ("四十七", 47),
    ("四十八", 48),
    ("四十九", 49),
    ("五十", 50),
    ("五十一", 51),
    ("五十二", 52),
    ("五十三", 53),
    ("五十四", 54),
    ("五十五", 55),
    ("五十六", 56),
    ("五十七", 57),
    ("五十八", 58),
    ("五十九", 59),
    ("六十", 60),
    ("六十一", 61),
    ("六十二", 62),
    ("六十三", 63),
    ("六十四", 64),
    ("六十五", 65),
    ("六十六", 66),
    ("六十七", 67),
    ("六十八", 68),
    ("六十九", 69),
    ("七十", 70),
    ("七十一", 71),
    ("七十二", 72),
    ("七十三", 73),
    ("七十四", 74),
    ("七十五", 75),
    ("七十六", 76),
    ("七十七", 77),
    ("七十八", 78),
    ("七十九", 79),
    ("八十", 80),
    ("八十一", 81),
    ("八十二", 82),
    ("八十三", 83),
    ("八十四", 84),
    ("八十五", 85),
    ("八十六", 86),
    ("八十七", 87),
    ("八十八", 88),
    ("八十九", 89),
    ("九十", 90),
    ("九十一", 91),
    ("九十二", 92),
    ("九十三", 93),
    ("九十四", 94),
    ("九十五", 95),
    ("九十六", 96),
    ("九十七", 97),
    ("九十八", 98),
    ("九十九", 99),
    ("一百", 100),
];

static LOOKUP: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| CHINESE_NUMBERS.iter().copied().collect());

/// Normalize an ordinal token to its numeric value.
///
/// Accepts the composed classical numerals 1..=100 and plain decimal digits.
/// Anything else is `None`.
pub fn chinese_number(token: &str) -> Option<u32> {
    let trimmed = token.trim();
    if let Some(&value) = LOOKUP.get(trimmed) {
        return Some(value);
    }
    trimmed.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_numerals_resolve() {
        assert_eq!(chinese_number("一"), Some(1));
        assert_eq!(chinese_number("十二"), Some(12));
        assert_eq!(chinese_number("六十"), Some(60));
        assert_eq!(chinese_number("九十九"), Some(99));
        assert_eq!(chinese_number("一百"), Some(100));
    }

    #[test]
    fn decimal_fallback() {
        assert_eq!(chinese_number("7"), Some(7));
        assert_eq!(chinese_number(" 42 "), Some(42));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(chinese_number("abc"), None);
        assert_eq!(chinese_number(""), None);
        assert_eq!(chinese_number("百一"), None);
    }

    #[test]
    fn table_covers_one_to_hundred() {
        let mut values: Vec<u32> = CHINESE_NUMBERS.iter().map(|&(_, v)| v).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values, (1..=100).collect::<Vec<u32>>());
    }
}
