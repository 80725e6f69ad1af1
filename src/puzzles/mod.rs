//! Static puzzle data: the presentational catalog (riddle text and hints)
//! and the answer registry of accepted digests.

use indexmap::{IndexMap, IndexSet};
use sha2::{Digest, Sha256};

/// Identifier of one puzzle in the hunt, `1..=TOTAL_PUZZLES`.
pub type PuzzleId = u32;

/// Number of puzzles in the hunt.
pub const TOTAL_PUZZLES: u32 = 14;

/// Digest of a submitted answer: SHA-256 over the normalized text, rendered
/// as lowercase hex. Pure and stable, so equal answers always collide with
/// their registry entry. This is obfuscation of the stored answers, not a
/// security control; anyone holding the registry can guess offline.
pub fn answer_digest(raw: &str) -> String {
    let digest = Sha256::digest(normalize(raw).as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Canonical form used for comparison: surrounding whitespace stripped,
/// lowercased. The attempt log stores the pre-normalization text.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Static mapping from puzzle id to the set of accepted answer digests.
///
/// Read-only after construction; several phrasings of the same answer may be
/// registered per puzzle.
pub struct AnswerRegistry {
    accepted: IndexMap<PuzzleId, IndexSet<String>>,
}

impl AnswerRegistry {
    /// Build a registry from explicit digest sets. Primarily for tests; the
    /// shipped hunt uses [`AnswerRegistry::builtin`].
    pub fn new(accepted: IndexMap<PuzzleId, IndexSet<String>>) -> Self {
        Self { accepted }
    }

    /// Accepted digests for a puzzle; unknown ids yield an empty iterator.
    pub fn digests(&self, id: PuzzleId) -> impl Iterator<Item = &str> {
        self.accepted
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether `digest` is an accepted answer digest for `id`.
    pub fn is_accepted(&self, id: PuzzleId, digest: &str) -> bool {
        self.accepted
            .get(&id)
            .is_some_and(|set| set.contains(digest))
    }

    /// Registry covering the shipped hunt, one entry per catalog puzzle.
    pub fn builtin() -> Self {
        let accepted = BUILTIN_ANSWERS
            .iter()
            .map(|(id, digests)| {
                let set = digests.iter().map(|d| (*d).to_string()).collect();
                (*id, set)
            })
            .collect();
        Self { accepted }
    }
}

/// Presentational data for one puzzle page.
#[derive(Debug, Clone, Copy)]
pub struct PuzzleEntry {
    /// Page heading.
    pub title: &'static str,
    /// Riddle body shown to the player.
    pub body: &'static str,
    /// Hint revealed on request.
    pub hint: &'static str,
}

/// Read-only catalog of every puzzle page, keyed by id.
pub struct PuzzleCatalog {
    entries: IndexMap<PuzzleId, PuzzleEntry>,
}

impl PuzzleCatalog {
    /// Catalog of the shipped hunt.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(id, entry)| (*id, *entry))
            .collect();
        Self { entries }
    }

    /// Presentational data for a puzzle, if the id is part of the hunt.
    pub fn entry(&self, id: PuzzleId) -> Option<&PuzzleEntry> {
        self.entries.get(&id)
    }

    /// Whether the id names a puzzle in this hunt.
    pub fn contains(&self, id: PuzzleId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of puzzles in the hunt.
    pub fn total(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Iterate over `(id, entry)` pairs in hunt order.
    pub fn iter(&self) -> impl Iterator<Item = (PuzzleId, &PuzzleEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Id of the puzzle after `id`, or `None` past the end of the hunt.
    pub fn next_id(&self, id: PuzzleId) -> Option<PuzzleId> {
        let next = id + 1;
        self.contains(next).then_some(next)
    }
}

/// SHA-256 digests of the normalized accepted answers, one row per puzzle.
const BUILTIN_ANSWERS: &[(PuzzleId, &[&str])] = &[
    (1, &["a930ac44893b382472498b07d85189a787de1ad10285e5ed9c9c1c8d16524bd5"]),
    (2, &["a2e1c40da1ae335d4dffe729eb4d5ca23b74b9e51fc535f4a804a261080c294d"]),
    (3, &["4c94485e0c21ae6c41ce1dfe7b6bfaceea5ab68e40a2476f50208e526f506080"]),
    (4, &["c0dc64098621e8db5521095082864147f1729590b741d2e86be47b152ebc21a5"]),
    (5, &["54482595177116e6103b076dbf30648e5d0537dd1ed9cf5ae4562fa8a700d47b"]),
    (
        6,
        &[
            "acac86c0e609ca906f632b0e2dacccb2b77d22b0621f20ebece1a4835b93f6f0",
            "f5b42f5b50ac30aec5d0e170e1159d4d9133030c1a722db1cabd5912b8ef345f",
        ],
    ),
    (7, &["1120afbe258087039422094482e2db8667846b4e2a9adb6f41740e6acd208f6c"]),
    (
        8,
        &[
            "757cb3491876e19aa86e4cf563af4a85d39cf083c8d360f2bf13f78535886f47",
            "a3ede7275589c17cc4cfb4b5b3aafededcb64f80e8e0c0c537b5e18057c26a82",
        ],
    ),
    (9, &["22761ff700fcce8c281051226dc21379646b15da0da6c6e5451bb54eab03185a"]),
    (10, &["f1f1b2551666c6175735aa17a5830691376391a6c517ff91175295f322778518"]),
    (11, &["fd8cc779bce474283c3ec89ef0ee9340b979e150d515b04796decedd809b0638"]),
    (
        12,
        &[
            "3222cbaf054fd0387ff44b9b91d588f0d2b39d7beba5470e0d1e566f0385cb46",
            "d2fd7895711e5aba19bed609210bdb6a37d69b9e7e7d4818affa3f98f3ed9dc2",
            "e4b54cecc80c35069d2645930160e45e6b45fb821c96f2c69ce5435cc71e3991",
        ],
    ),
    (
        13,
        &[
            "7beefe86cb129def7ea1c45e3cd740b7cc24d2b7d00fbfe5ed848607ead9b44f",
            "e2dc13ee2937512f50cc4eb177c3d9d694e26e0d7257ec74edcbee68f1907d57",
            "64e0f66653ae308b73db466b298c4fc266669c4bfeaff28e8ef0ba890652bfca",
        ],
    ),
    (14, &["d388025f9f48d31d385ccc6437e1f40c5f8a3772fc20bba055ce445ede6b0907"]),
];

const BUILTIN_ENTRIES: &[(PuzzleId, PuzzleEntry)] = &[
    (
        1,
        PuzzleEntry {
            title: "The First Clue",
            body: "Welcome to your first puzzle! Look around carefully - sometimes the answer is right in front of you.",
            hint: "Check the page source or developer tools for hidden clues!",
        },
    ),
    (
        2,
        PuzzleEntry {
            title: "Number Patterns",
            body: "What comes next in this sequence: 2, 4, 8, 16, ?",
            hint: "Each number is double the previous one.",
        },
    ),
    (
        3,
        PuzzleEntry {
            title: "Word Play",
            body: "I am a word of letters three, add two and fewer there will be. What am I?",
            hint: "Think about the word \"few\" and what happens when you add letters.",
        },
    ),
    (
        4,
        PuzzleEntry {
            title: "Visual Puzzle",
            body: "Examine the layout of this page carefully. What do you notice about the structure?",
            hint: "Look at the HTML structure and CSS classes.",
        },
    ),
    (
        5,
        PuzzleEntry {
            title: "Logic Challenge",
            body: "If all roses are flowers, and some flowers are red, can we say all roses are red?",
            hint: "Think about the logical relationships between these statements.",
        },
    ),
    (
        6,
        PuzzleEntry {
            title: "Code Breaking",
            body: "Decode this message: ROVVY GUR JBEYQ",
            hint: "This is a simple substitution cipher. Try shifting letters by 13 positions.",
        },
    ),
    (
        7,
        PuzzleEntry {
            title: "Mathematical Mystery",
            body: "What is the sum of all prime numbers between 1 and 20?",
            hint: "Prime numbers are only divisible by 1 and themselves: 2, 3, 5, 7, 11, 13, 17, 19",
        },
    ),
    (
        8,
        PuzzleEntry {
            title: "Hidden Message",
            body: "Look for patterns in the button colors and gradients on the main page.",
            hint: "The colors might spell out a word or message when arranged properly.",
        },
    ),
    (
        9,
        PuzzleEntry {
            title: "Riddle Me This",
            body: "I speak without a mouth and hear without ears. I have no body, but come alive with wind. What am I?",
            hint: "Think about things that make sounds when wind passes through them.",
        },
    ),
    (
        10,
        PuzzleEntry {
            title: "Pattern Recognition",
            body: "What is the next shape in this sequence: ○, □, △, ○, □, ?",
            hint: "Look at the pattern of shapes repeating every three items.",
        },
    ),
    (
        11,
        PuzzleEntry {
            title: "Master Challenge 1",
            body: "This is a complex puzzle requiring multiple steps. First, find the hidden number in this page.",
            hint: "Check the console for any logged messages or errors.",
        },
    ),
    (
        12,
        PuzzleEntry {
            title: "Master Challenge 2",
            body: "Decode this advanced cipher: ZKHUH LV WKH DQVZHU",
            hint: "This uses a different shift than the previous cipher. Try Caesar cipher with different keys.",
        },
    ),
    (
        13,
        PuzzleEntry {
            title: "Master Challenge 3",
            body: "Find the connection between all the puzzle numbers and their corresponding sections.",
            hint: "Look at the mathematical relationships between puzzle numbers and section numbers.",
        },
    ),
    (
        14,
        PuzzleEntry {
            title: "Final Master Puzzle",
            body: "Congratulations on reaching the final puzzle! Combine all your previous answers to solve this ultimate challenge.",
            hint: "You might need to look back at all your previous solutions and find a pattern.",
        },
    ),
];
