use rusqlite::Connection;
use thiserror::Error;

use super::table::{ResultTable, read_table};

#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("unknown catalog query: {0} (use `query --list` to see the catalog)")]
    UnknownQuery(String),

    #[error("query {number} ({title}) requires --artifact-id")]
    MissingArtifactId { number: u8, title: &'static str },

    #[error("query {number} ({title}) takes no artifact id")]
    UnexpectedArtifactId { number: u8, title: &'static str },

    #[error("query execution failed: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// The fixed analysis catalog. Only [`CatalogQuery::ColorsForArtifact`]
/// binds a value, and that value is always one `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CatalogQuery {
    ByzantineEleventhCentury,
    UniqueCultures,
    ArchaicPeriod,
    TitlesByAccessionYear,
    CountPerDepartment,
    MultipleImages,
    AverageRank,
    ColorsExceedMedia,
    DatedFifteenHundreds,
    WithoutMedia,
    DistinctHues,
    TopColors,
    AveragePercentPerHue,
    ColorsForArtifact,
    TotalColorEntries,
    ByzantineHues,
    TitlesWithHues,
    RankedWithPeriod,
    TopGreyArtifacts,
    AverageMediaPerClassification,
    WithoutCulture,
    BeforeYearOneThousand,
    MaxColorCoverage,
    LargeDepartments,
    MostCommonClassification,
}

impl CatalogQuery {
    pub const ALL: [CatalogQuery; 25] = [
        Self::ByzantineEleventhCentury,
        Self::UniqueCultures,
        Self::ArchaicPeriod,
        Self::TitlesByAccessionYear,
        Self::CountPerDepartment,
        Self::MultipleImages,
        Self::AverageRank,
        Self::ColorsExceedMedia,
        Self::DatedFifteenHundreds,
        Self::WithoutMedia,
        Self::DistinctHues,
        Self::TopColors,
        Self::AveragePercentPerHue,
        Self::ColorsForArtifact,
        Self::TotalColorEntries,
        Self::ByzantineHues,
        Self::TitlesWithHues,
        Self::RankedWithPeriod,
        Self::TopGreyArtifacts,
        Self::AverageMediaPerClassification,
        Self::WithoutCulture,
        Self::BeforeYearOneThousand,
        Self::MaxColorCoverage,
        Self::LargeDepartments,
        Self::MostCommonClassification,
    ];

    pub fn number(self) -> u8 {
        match self {
            Self::ByzantineEleventhCentury => 1,
            Self::UniqueCultures => 2,
            Self::ArchaicPeriod => 3,
            Self::TitlesByAccessionYear => 4,
            Self::CountPerDepartment => 5,
            Self::MultipleImages => 6,
            Self::AverageRank => 7,
            Self::ColorsExceedMedia => 8,
            Self::DatedFifteenHundreds => 9,
            Self::WithoutMedia => 10,
            Self::DistinctHues => 11,
            Self::TopColors => 12,
            Self::AveragePercentPerHue => 13,
            Self::ColorsForArtifact => 14,
            Self::TotalColorEntries => 15,
            Self::ByzantineHues => 16,
            Self::TitlesWithHues => 17,
            Self::RankedWithPeriod => 18,
            Self::TopGreyArtifacts => 19,
            Self::AverageMediaPerClassification => 20,
            Self::WithoutCulture => 21,
            Self::BeforeYearOneThousand => 22,
            Self::MaxColorCoverage => 23,
            Self::LargeDepartments => 24,
            Self::MostCommonClassification => 25,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ByzantineEleventhCentury => "Artifacts from 11th century Byzantine culture",
            Self::UniqueCultures => "Unique cultures",
            Self::ArchaicPeriod => "Artifacts from Archaic Period",
            Self::TitlesByAccessionYear => "Titles ordered by accession year",
            Self::CountPerDepartment => "Artifact count per department",
            Self::MultipleImages => "Artifacts with more than 1 image",
            Self::AverageRank => "Average rank",
            Self::ColorsExceedMedia => "Colorcount > mediacount",
            Self::DatedFifteenHundreds => "Artifacts between 1500-1600",
            Self::WithoutMedia => "Artifacts with no media",
            Self::DistinctHues => "Distinct hues",
            Self::TopColors => "Top 5 colors",
            Self::AveragePercentPerHue => "Avg percent per hue",
            Self::ColorsForArtifact => "Colors for artifact",
            Self::TotalColorEntries => "Total color entries",
            Self::ByzantineHues => "Byzantine artifacts with hues",
            Self::TitlesWithHues => "Titles with hues",
            Self::RankedWithPeriod => "Titles, culture, rank where period not null",
            Self::TopGreyArtifacts => "Top 10 Grey artifacts",
            Self::AverageMediaPerClassification => "Avg media per classification",
            Self::WithoutCulture => "Artifacts without culture",
            Self::BeforeYearOneThousand => "Artifacts before year 1000",
            Self::MaxColorCoverage => "Max color coverage",
            Self::LargeDepartments => "Departments with >50 artifacts",
            Self::MostCommonClassification => "Most common classification",
        }
    }

    /// Numbered form shown in listings, e.g. `14. Colors for artifact`.
    pub fn label(self) -> String {
        format!("{}. {}", self.number(), self.title())
    }

    pub fn sql(self) -> &'static str {
        match self {
            Self::ByzantineEleventhCentury => {
                "SELECT * FROM artifact_metadata WHERE century='11th century' AND culture='Byzantine'"
            }
            Self::UniqueCultures => "SELECT DISTINCT culture FROM artifact_metadata",
            Self::ArchaicPeriod => "SELECT * FROM artifact_metadata WHERE period='Archaic Period'",
            Self::TitlesByAccessionYear => {
                "SELECT title, accessionyear FROM artifact_metadata ORDER BY accessionyear DESC"
            }
            Self::CountPerDepartment => {
                "SELECT department, COUNT(*) FROM artifact_metadata GROUP BY department"
            }
            Self::MultipleImages => "SELECT objectid FROM artifact_media WHERE imagecount > 1",
            Self::AverageRank => "SELECT AVG(rank) FROM artifact_media",
            Self::ColorsExceedMedia => {
                "SELECT objectid FROM artifact_media WHERE colorcount > mediacount"
            }
            Self::DatedFifteenHundreds => {
                "SELECT objectid FROM artifact_media WHERE datebegin >= 1500 AND dateend <= 1600"
            }
            Self::WithoutMedia => "SELECT COUNT(*) FROM artifact_media WHERE mediacount = 0",
            Self::DistinctHues => "SELECT DISTINCT hue FROM artifact_colors",
            Self::TopColors => {
                "SELECT color, COUNT(*) cnt FROM artifact_colors GROUP BY color ORDER BY cnt DESC LIMIT 5"
            }
            Self::AveragePercentPerHue => {
                "SELECT hue, AVG(percent) FROM artifact_colors GROUP BY hue"
            }
            Self::ColorsForArtifact => "SELECT * FROM artifact_colors WHERE objectid = ?1",
            Self::TotalColorEntries => "SELECT COUNT(*) FROM artifact_colors",
            Self::ByzantineHues => {
                "SELECT m.title, c.hue FROM artifact_metadata m JOIN artifact_colors c ON m.id=c.objectid WHERE m.culture='Byzantine'"
            }
            Self::TitlesWithHues => {
                "SELECT m.title, c.hue FROM artifact_metadata m JOIN artifact_colors c ON m.id=c.objectid"
            }
            Self::RankedWithPeriod => {
                "SELECT m.title, m.culture, me.rank FROM artifact_metadata m JOIN artifact_media me ON m.id=me.objectid WHERE m.period IS NOT NULL"
            }
            Self::TopGreyArtifacts => {
                "SELECT DISTINCT m.title FROM artifact_metadata m JOIN artifact_colors c ON m.id=c.objectid WHERE c.hue='Grey' LIMIT 10"
            }
            Self::AverageMediaPerClassification => {
                "SELECT m.classification, AVG(me.mediacount) FROM artifact_metadata m JOIN artifact_media me ON m.id=me.objectid GROUP BY m.classification"
            }
            Self::WithoutCulture => "SELECT * FROM artifact_metadata WHERE culture IS NULL",
            Self::BeforeYearOneThousand => "SELECT * FROM artifact_media WHERE datebegin < 1000",
            Self::MaxColorCoverage => {
                "SELECT objectid, MAX(percent) FROM artifact_colors GROUP BY objectid"
            }
            Self::LargeDepartments => {
                "SELECT department FROM artifact_metadata GROUP BY department HAVING COUNT(*) > 50"
            }
            Self::MostCommonClassification => {
                "SELECT classification, COUNT(*) FROM artifact_metadata GROUP BY classification ORDER BY COUNT(*) DESC"
            }
        }
    }

    pub fn requires_artifact_id(self) -> bool {
        matches!(self, Self::ColorsForArtifact)
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|query| query.number() == number)
    }

    /// Resolves a number, a title, or a numbered label (case-insensitive).
    pub fn find(selector: &str) -> Result<Self, CatalogError> {
        let selector = selector.trim();

        let by_number = selector
            .trim_end_matches('.')
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number);
        if let Some(query) = by_number {
            return Ok(query);
        }

        Self::ALL
            .into_iter()
            .find(|query| {
                query.title().eq_ignore_ascii_case(selector)
                    || query.label().eq_ignore_ascii_case(selector)
            })
            .ok_or_else(|| CatalogError::UnknownQuery(selector.to_string()))
    }
}

/// Runs one catalog entry read-only against the store.
pub(crate) fn execute(
    connection: &Connection,
    query: CatalogQuery,
    artifact_id: Option<i64>,
) -> Result<ResultTable, CatalogError> {
    match (query.requires_artifact_id(), artifact_id) {
        (true, None) => Err(CatalogError::MissingArtifactId {
            number: query.number(),
            title: query.title(),
        }),
        (false, Some(_)) => Err(CatalogError::UnexpectedArtifactId {
            number: query.number(),
            title: query.title(),
        }),
        (true, Some(id)) => {
            let mut statement = connection.prepare(query.sql())?;
            Ok(read_table(&mut statement, [id])?)
        }
        (false, None) => {
            let mut statement = connection.prepare(query.sql())?;
            Ok(read_table(&mut statement, [])?)
        }
    }
}
