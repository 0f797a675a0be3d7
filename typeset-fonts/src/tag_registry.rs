//! Canonical script, language system and feature tags.
//!
//! The same four bytes can name a script, a language system and a feature at
//! once (`DFLT` is a script, `dflt` a language, `kern` a feature), so every
//! tag is registered under a [`TagKind`]. Each kind has its own map; looking up
//! the same text under the same kind always yields the same [`Arc`].
//!
//! A process-wide registry is available through [`TagRegistry::global`]. Code
//! that prefers not to share state can construct its own with
//! [`TagRegistry::new`] and pass it around explicitly.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;
use types::Tag;

/// The three namespaces a layout tag can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagKind {
    Script,
    Language,
    Feature,
}

impl TagKind {
    /// Kinds in the order [`TagRegistry::resolve`] probes them.
    pub const RESOLUTION_ORDER: [TagKind; 3] =
        [TagKind::Script, TagKind::Feature, TagKind::Language];

    /// The code used when no explicit tag of this kind is requested.
    pub const fn default_tag(self) -> Tag {
        match self {
            TagKind::Script => Tag::new(b"DFLT"),
            TagKind::Language | TagKind::Feature => Tag::new(b"dflt"),
        }
    }

    fn builtins(self) -> &'static [(&'static [u8; 4], &'static str)] {
        match self {
            TagKind::Script => SCRIPTS,
            TagKind::Language => LANGUAGES,
            TagKind::Feature => FEATURES,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Script => f.write_str("script"),
            TagKind::Language => f.write_str("language"),
            TagKind::Feature => f.write_str("feature"),
        }
    }
}

/// A four-byte tag together with the namespace it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutTag {
    Script(Tag),
    Language(Tag),
    Feature(Tag),
}

impl LayoutTag {
    pub fn new(kind: TagKind, tag: Tag) -> Self {
        match kind {
            TagKind::Script => LayoutTag::Script(tag),
            TagKind::Language => LayoutTag::Language(tag),
            TagKind::Feature => LayoutTag::Feature(tag),
        }
    }

    /// Normalize `text` to exactly four bytes (truncating, or padding with
    /// spaces) and tag it with `kind`.
    pub fn from_text(text: &str, kind: TagKind) -> Self {
        Self::new(kind, Tag::from_str_lossy(text))
    }

    pub fn kind(&self) -> TagKind {
        match self {
            LayoutTag::Script(_) => TagKind::Script,
            LayoutTag::Language(_) => TagKind::Language,
            LayoutTag::Feature(_) => TagKind::Feature,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            LayoutTag::Script(tag) | LayoutTag::Language(tag) | LayoutTag::Feature(tag) => *tag,
        }
    }
}

impl fmt::Display for LayoutTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.tag())
    }
}

/// The canonical instance of a registered tag.
///
/// Registries hand these out behind an [`Arc`]; two lookups of the same code
/// and kind return pointers to the same allocation.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RegisteredTag {
    tag: LayoutTag,
    name: Option<&'static str>,
}

impl RegisteredTag {
    pub fn layout_tag(&self) -> LayoutTag {
        self.tag
    }

    pub fn kind(&self) -> TagKind {
        self.tag.kind()
    }

    pub fn tag(&self) -> Tag {
        self.tag.tag()
    }

    /// The registered name of a built-in tag, such as "Standard Ligatures"
    /// for `liga`.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// `true` if this is one of the tags registered with OpenType.
    pub fn is_builtin(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Display for RegisteredTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{} ({name})", self.tag),
            None => self.tag.fmt(f),
        }
    }
}

type TagMap = RwLock<HashMap<Tag, Arc<RegisteredTag>>>;

/// Maps tag text to canonical, kind-tagged instances.
///
/// Entries are never removed. Insertion is atomic: concurrent first use of
/// a code from several threads produces exactly one instance.
#[derive(Debug, Default)]
pub struct TagRegistry {
    scripts: TagMap,
    languages: TagMap,
    features: TagMap,
}

impl TagRegistry {
    /// Create an empty registry.
    ///
    /// Built-in tags are always members; they are materialized on first access.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static TagRegistry {
        static GLOBAL: OnceLock<TagRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TagRegistry::new)
    }

    fn map(&self, kind: TagKind) -> &TagMap {
        match kind {
            TagKind::Script => &self.scripts,
            TagKind::Language => &self.languages,
            TagKind::Feature => &self.features,
        }
    }

    /// Return the canonical instance for `text` under `kind`, registering it
    /// if this is the first time it has been seen.
    pub fn get_instance(&self, text: &str, kind: TagKind) -> Arc<RegisteredTag> {
        self.register(LayoutTag::from_text(text, kind))
    }

    /// Return the canonical instance for an already-normalized tag, inserting
    /// it if absent.
    pub fn register(&self, tag: LayoutTag) -> Arc<RegisteredTag> {
        let map = self.map(tag.kind());
        if let Some(existing) = map.read().get(&tag.tag()) {
            return existing.clone();
        }
        let mut map = map.write();
        map.entry(tag.tag())
            .or_insert_with(|| {
                let name = builtin_name(tag.kind(), tag.tag());
                if name.is_none() {
                    log::debug!("registering unknown {tag}");
                }
                Arc::new(RegisteredTag { tag, name })
            })
            .clone()
    }

    /// Return the canonical instance for `text` under `kind` without
    /// registering anything new.
    ///
    /// Built-in tags are materialized on first access, so this returns
    /// `Some` for every registered OpenType tag.
    pub fn get(&self, text: &str, kind: TagKind) -> Option<Arc<RegisteredTag>> {
        let tag = LayoutTag::from_text(text, kind);
        if let Some(existing) = self.map(kind).read().get(&tag.tag()) {
            return Some(existing.clone());
        }
        builtin_name(kind, tag.tag()).map(|_| self.register(tag))
    }

    /// Returns `true` if `text` names a tag of this kind, without creating one.
    pub fn contains_tag(&self, text: &str, kind: TagKind) -> bool {
        let tag = Tag::from_str_lossy(text);
        self.map(kind).read().contains_key(&tag) || builtin_name(kind, tag).is_some()
    }

    /// The default tag for `kind`: `DFLT` for scripts, `dflt` otherwise.
    pub fn get_default(&self, kind: TagKind) -> Arc<RegisteredTag> {
        self.register(LayoutTag::new(kind, kind.default_tag()))
    }

    /// Find `text` without knowing its kind.
    ///
    /// Scripts are probed first, then features, then languages; the first
    /// registry containing the code wins.
    pub fn resolve(&self, text: &str) -> Option<Arc<RegisteredTag>> {
        TagKind::RESOLUTION_ORDER
            .into_iter()
            .find_map(|kind| self.get(text, kind))
    }

    /// The number of materialized tags of the given kind.
    pub fn len(&self, kind: TagKind) -> usize {
        self.map(kind).read().len()
    }
}

fn builtin_name(kind: TagKind, tag: Tag) -> Option<&'static str> {
    let builtins = kind.builtins();
    builtins
        .binary_search_by(|(code, _)| code.as_slice().cmp(tag.to_be_bytes().as_slice()))
        .ok()
        .map(|ix| builtins[ix].1)
}

// The tables below are sorted by code so they can be binary searched.

/// Registered script tags.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/scripttags>
static SCRIPTS: &[(&[u8; 4], &str)] = &[
    (b"DFLT", "Default"),
    (b"arab", "Arabic"),
    (b"armn", "Armenian"),
    (b"beng", "Bengali"),
    (b"bng2", "Bengali v.2"),
    (b"bopo", "Bopomofo"),
    (b"brai", "Braille"),
    (b"byzm", "Byzantine Music"),
    (b"cher", "Cherokee"),
    (b"cyrl", "Cyrillic"),
    (b"dev2", "Devanagari v.2"),
    (b"deva", "Devanagari"),
    (b"ethi", "Ethiopic"),
    (b"geor", "Georgian"),
    (b"gjr2", "Gujarati v.2"),
    (b"grek", "Greek"),
    (b"gujr", "Gujarati"),
    (b"gur2", "Gurmukhi v.2"),
    (b"guru", "Gurmukhi"),
    (b"hang", "Hangul"),
    (b"hani", "CJK Ideographic"),
    (b"hebr", "Hebrew"),
    (b"kana", "Hiragana and Katakana"),
    (b"khmr", "Khmer"),
    (b"knd2", "Kannada v.2"),
    (b"knda", "Kannada"),
    (b"lao ", "Lao"),
    (b"latn", "Latin"),
    (b"math", "Mathematical Alphanumeric Symbols"),
    (b"mlm2", "Malayalam v.2"),
    (b"mlym", "Malayalam"),
    (b"mong", "Mongolian"),
    (b"musc", "Musical Symbols"),
    (b"mym2", "Myanmar v.2"),
    (b"mymr", "Myanmar"),
    (b"ogam", "Ogham"),
    (b"ory2", "Odia v.2"),
    (b"orya", "Odia"),
    (b"runr", "Runic"),
    (b"sinh", "Sinhala"),
    (b"syrc", "Syriac"),
    (b"taml", "Tamil"),
    (b"tel2", "Telugu v.2"),
    (b"telu", "Telugu"),
    (b"thaa", "Thaana"),
    (b"thai", "Thai"),
    (b"tibt", "Tibetan"),
    (b"tml2", "Tamil v.2"),
    (b"yi  ", "Yi"),
];

/// Registered language system tags.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/languagetags>
static LANGUAGES: &[(&[u8; 4], &str)] = &[
    (b"ARA ", "Arabic"),
    (b"CAT ", "Catalan"),
    (b"CHN ", "Chinese, Hong Kong SAR"),
    (b"CSY ", "Czech"),
    (b"DAN ", "Danish"),
    (b"DEU ", "German"),
    (b"ELL ", "Greek"),
    (b"ENG ", "English"),
    (b"ESP ", "Spanish"),
    (b"FAR ", "Persian"),
    (b"FIN ", "Finnish"),
    (b"FRA ", "French"),
    (b"HIN ", "Hindi"),
    (b"HUN ", "Hungarian"),
    (b"IPPH", "Phonetic transcription, IPA conventions"),
    (b"IRI ", "Irish"),
    (b"ISL ", "Icelandic"),
    (b"ITA ", "Italian"),
    (b"IWR ", "Hebrew"),
    (b"JAN ", "Japanese"),
    (b"KOR ", "Korean"),
    (b"MOL ", "Moldavian"),
    (b"NLD ", "Dutch"),
    (b"NOR ", "Norwegian"),
    (b"PLK ", "Polish"),
    (b"PTG ", "Portuguese"),
    (b"ROM ", "Romanian"),
    (b"RUS ", "Russian"),
    (b"SKY ", "Slovak"),
    (b"SRB ", "Serbian"),
    (b"SVE ", "Swedish"),
    (b"TRK ", "Turkish"),
    (b"URD ", "Urdu"),
    (b"ZHH ", "Chinese, Traditional, Hong Kong SAR"),
    (b"ZHS ", "Chinese, Simplified"),
    (b"ZHT ", "Chinese, Traditional"),
    (b"dflt", "Default"),
];

/// Registered feature tags.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/featuretags>
static FEATURES: &[(&[u8; 4], &str)] = &[
    (b"aalt", "Access All Alternates"),
    (b"abvm", "Above-base Mark Positioning"),
    (b"afrc", "Alternative Fractions"),
    (b"akhn", "Akhand"),
    (b"blwm", "Below-base Mark Positioning"),
    (b"c2pc", "Petite Capitals From Capitals"),
    (b"c2sc", "Small Capitals From Capitals"),
    (b"calt", "Contextual Alternates"),
    (b"case", "Case-sensitive Forms"),
    (b"ccmp", "Glyph Composition / Decomposition"),
    (b"clig", "Contextual Ligatures"),
    (b"cpsp", "Capital Spacing"),
    (b"cswh", "Contextual Swash"),
    (b"curs", "Cursive Positioning"),
    (b"dflt", "Default"),
    (b"dlig", "Discretionary Ligatures"),
    (b"dnom", "Denominators"),
    (b"fina", "Terminal Forms"),
    (b"frac", "Fractions"),
    (b"fwid", "Full Widths"),
    (b"hist", "Historical Forms"),
    (b"hlig", "Historical Ligatures"),
    (b"hwid", "Half Widths"),
    (b"init", "Initial Forms"),
    (b"isol", "Isolated Forms"),
    (b"ital", "Italics"),
    (b"kern", "Kerning"),
    (b"liga", "Standard Ligatures"),
    (b"lnum", "Lining Figures"),
    (b"locl", "Localized Forms"),
    (b"mark", "Mark Positioning"),
    (b"medi", "Medial Forms"),
    (b"mkmk", "Mark to Mark Positioning"),
    (b"nalt", "Alternate Annotation Forms"),
    (b"numr", "Numerators"),
    (b"onum", "Oldstyle Figures"),
    (b"ordn", "Ordinals"),
    (b"ornm", "Ornaments"),
    (b"pcap", "Petite Capitals"),
    (b"pnum", "Proportional Figures"),
    (b"pwid", "Proportional Widths"),
    (b"rlig", "Required Ligatures"),
    (b"rvrn", "Required Variation Alternates"),
    (b"salt", "Stylistic Alternates"),
    (b"sinf", "Scientific Inferiors"),
    (b"smcp", "Small Capitals"),
    (b"ss01", "Stylistic Set 1"),
    (b"ss02", "Stylistic Set 2"),
    (b"ss03", "Stylistic Set 3"),
    (b"subs", "Subscript"),
    (b"sups", "Superscript"),
    (b"swsh", "Swash"),
    (b"titl", "Titling"),
    (b"tnum", "Tabular Figures"),
    (b"unic", "Unicase"),
    (b"vert", "Vertical Alternates"),
    (b"vkrn", "Vertical Kerning"),
    (b"vrt2", "Vertical Alternates and Rotation"),
    (b"zero", "Slashed Zero"),
];
