use serde::Serialize;

/// The five supported stick-numbering systems. 媽祖靈籤 is a numbering alias
/// of 六十甲子籤: same corpus, same sexagenary table, different identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FortuneSystem {
    Guanyin,
    Guandi,
    Liushijiazi,
    Mazu,
    Lvzu,
}

/// Static descriptor for one system: identity, size, source corpus, and the
/// sexagenary label table for cycle-numbered systems, indexable by
/// `number - 1`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub count: u32,
    pub description: &'static str,
    pub temple: &'static str,
    pub data_file: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexagenary_labels: Option<&'static [&'static str]>,
}

static SYSTEMS: [SystemInfo; 5] = [
    SystemInfo {
        id: "guanyin",
        name: "觀音靈籤",
        count: 100,
        description: "觀世音菩薩百首靈籤，廣泛使用於各地觀音廟宇",
        temple: "龍山寺、各地觀音廟",
        data_file: "觀音靈籤.md",
        sexagenary_labels: None,
    },
    SystemInfo {
        id: "guandi",
        name: "關帝靈籤",
        count: 100,
        description: "關聖帝君百首靈籤，常見於關帝廟與武廟",
        temple: "行天宮、各地關帝廟",
        data_file: "關帝靈籤.md",
        sexagenary_labels: None,
    },
    SystemInfo {
        id: "liushijiazi",
        name: "六十甲子籤",
        count: 60,
        description: "以天干地支排列的六十支籤詩，常見於天后宮",
        temple: "台東天后宮、各地媽祖廟",
        data_file: "六十甲子籤.md",
        sexagenary_labels: Some(&TIANGAN_DIZHI),
    },
    SystemInfo {
        id: "mazu",
        name: "媽祖靈籤",
        count: 60,
        description: "媽祖廟使用的六十甲子籤系統",
        temple: "大甲鎮瀾宮、各地媽祖廟",
        data_file: "六十甲子籤.md",
        sexagenary_labels: Some(&TIANGAN_DIZHI),
    },
    SystemInfo {
        id: "lvzu",
        name: "呂祖靈籤",
        count: 60,
        description: "呂洞賓仙祖六十首靈籤，指南宮常用",
        temple: "指南宮、各地呂祖廟",
        data_file: "呂祖靈籤.md",
        sexagenary_labels: Some(&TIANGAN_DIZHI_STANDARD),
    },
];

/// 六十甲子籤 / 媽祖靈籤: grouped by heavenly stem, not the standard cycle.
static TIANGAN_DIZHI: [&str; 60] = [
    "甲子", "甲寅", "甲辰", "甲午", "甲申", "甲戌",
    "乙丑", "乙卯", "乙巳", "乙未", "乙酉", "乙亥",
    "丙子", "丙寅", "丙辰", "丙午", "丙申", "丙戌",
    "丁丑", "丁卯", "丁巳", "丁未", "丁酉", "丁亥",
    "戊子", "戊寅", "戊辰", "戊午", "戊申", "戊戌",
    "己丑", "己卯", "己巳", "己未", "己酉", "己亥",
    "庚子", "庚寅", "庚辰", "庚午", "庚申", "庚戌",
    "辛丑", "辛卯", "辛巳", "辛未", "辛酉", "辛亥",
    "壬子", "壬寅", "壬辰", "壬午", "壬申", "壬戌",
    "癸丑", "癸卯", "癸巳", "癸未", "癸酉", "癸亥",
];

/// 呂祖靈籤: standard sexagenary cycle order.
static TIANGAN_DIZHI_STANDARD: [&str; 60] = [
    "甲子", "乙丑", "丙寅", "丁卯", "戊辰", "己巳", "庚午", "辛未", "壬申", "癸酉",
    "甲戌", "乙亥", "丙子", "丁丑", "戊寅", "己卯", "庚辰", "辛巳", "壬午", "癸未",
    "甲申", "乙酉", "丙戌", "丁亥", "戊子", "己丑", "庚寅", "辛卯", "壬辰", "癸巳",
    "甲午", "乙未", "丙申", "丁酉", "戊戌", "己亥", "庚子", "辛丑", "壬寅", "癸卯",
    "甲辰", "乙巳", "丙午", "丁未", "戊申", "己酉", "庚戌", "辛亥", "壬子", "癸丑",
    "甲寅", "乙卯", "丙辰", "丁巳", "戊午", "己未", "庚申", "辛酉", "壬戌", "癸亥",
];

impl FortuneSystem {
    pub const ALL: [FortuneSystem; 5] = [
        FortuneSystem::Guanyin,
        FortuneSystem::Guandi,
        FortuneSystem::Liushijiazi,
        FortuneSystem::Mazu,
        FortuneSystem::Lvzu,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "guanyin" => Some(FortuneSystem::Guanyin),
            "guandi" => Some(FortuneSystem::Guandi),
            "liushijiazi" => Some(FortuneSystem::Liushijiazi),
            "mazu" => Some(FortuneSystem::Mazu),
            "lvzu" => Some(FortuneSystem::Lvzu),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        self.info().id
    }

    pub fn info(self) -> &'static SystemInfo {
        match self {
            FortuneSystem::Guanyin => &SYSTEMS[0],
            FortuneSystem::Guandi => &SYSTEMS[1],
            FortuneSystem::Liushijiazi => &SYSTEMS[2],
            FortuneSystem::Mazu => &SYSTEMS[3],
            FortuneSystem::Lvzu => &SYSTEMS[4],
        }
    }

    pub fn descriptors() -> &'static [SystemInfo; 5] {
        &SYSTEMS
    }

    /// Sexagenary label table for systems numbered by the 60-term cycle,
    /// indexable by `number - 1`.
    pub fn sexagenary_labels(self) -> Option<&'static [&'static str]> {
        self.info().sexagenary_labels
    }
}
