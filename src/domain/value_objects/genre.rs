//! Genre catalogue - primary genres and the subgenres each one offers

use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Primary genre of the novel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fantasy,
    ScienceFiction,
    Mystery,
    Thriller,
    Romance,
    Horror,
    HistoricalFiction,
    LiteraryFiction,
    Adventure,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Fantasy,
        Genre::ScienceFiction,
        Genre::Mystery,
        Genre::Thriller,
        Genre::Romance,
        Genre::Horror,
        Genre::HistoricalFiction,
        Genre::LiteraryFiction,
        Genre::Adventure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Mystery => "Mystery",
            Genre::Thriller => "Thriller",
            Genre::Romance => "Romance",
            Genre::Horror => "Horror",
            Genre::HistoricalFiction => "Historical Fiction",
            Genre::LiteraryFiction => "Literary Fiction",
            Genre::Adventure => "Adventure",
        }
    }

    pub fn subgenres(self) -> &'static [&'static str] {
        match self {
            Genre::Fantasy => &[
                "Epic Fantasy",
                "High Fantasy",
                "Urban Fantasy",
                "Dark Fantasy",
                "Sword and Sorcery",
                "Fairy Tale Retelling",
            ],
            Genre::ScienceFiction => &[
                "Space Opera",
                "Cyberpunk",
                "Hard Science Fiction",
                "Dystopian",
                "Post-Apocalyptic",
                "Time Travel",
            ],
            Genre::Mystery => &[
                "Cozy Mystery",
                "Detective",
                "Police Procedural",
                "Noir",
                "Locked Room",
            ],
            Genre::Thriller => &[
                "Psychological Thriller",
                "Legal Thriller",
                "Espionage",
                "Techno-Thriller",
                "Political Thriller",
            ],
            Genre::Romance => &[
                "Contemporary Romance",
                "Historical Romance",
                "Paranormal Romance",
                "Romantic Comedy",
                "Romantic Suspense",
            ],
            Genre::Horror => &[
                "Gothic Horror",
                "Cosmic Horror",
                "Supernatural Horror",
                "Psychological Horror",
                "Slasher",
            ],
            Genre::HistoricalFiction => &[
                "Ancient World",
                "Medieval",
                "Victorian",
                "World War Era",
                "Alternate History",
            ],
            Genre::LiteraryFiction => &[
                "Coming of Age",
                "Family Saga",
                "Magical Realism",
                "Satire",
            ],
            Genre::Adventure => &[
                "Quest",
                "Survival",
                "Treasure Hunt",
                "Swashbuckler",
            ],
        }
    }

    pub fn has_subgenre(self, subgenre: &str) -> bool {
        self.subgenres().iter().any(|s| *s == subgenre)
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Genre {
    type Err = ValidationError;

    /// Accepts either the display label ("Science Fiction") or the variant name ("ScienceFiction")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| {
                g.label().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", g).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "genre",
                value: s.to_string(),
            })
    }
}

/// How the novel treats the conventions of its genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreApproach {
    Traditional,
    Subversive,
    Hybrid,
    Experimental,
}
