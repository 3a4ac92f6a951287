//! Record schema for architectural projects.
//!
//! Every slot of a project record is listed exactly once here. Wire keys,
//! labels and form sections are all read from these tables so the
//! backend field names live in a single place.

use std::fmt;

/// Scalar (text) fields of a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    Title,
    ClientName,
    ProjectType,
    SiteAddress,
    GstNo,
    MahareraNo,
    ProjectHead,
    RccDesignerName,
    Pan,
    Aadhar,
    Pin,
    Email,
}

/// Attachment slots of a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileSlot {
    PresentationDrawing1,
    PresentationDrawing2,
    PresentationDrawing3,
    FileModel3d1,
    FileModel3d2,
    FileModel3d3,
    SubmissionDrawing,
    AllFloorPlan,
    AllSection,
    AllElevation,
    Toilet,
    AllElectricDrawing,
    TileLayout,
    AllGrillsAndRailing,
    ColumnFooting,
    PleanthBeam,
    StairCaseDrawing,
    Slab1,
    Slab2,
    Slab3,
    Slab4,
    Slab5,
    PropertyCard,
    PropertyMap,
    CompletionDrawing,
    SanctionDrawing,
    ReviseSanction,
    CompletionLetter,
}

/// One slot of the record, either a text field or an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldSlot {
    Text(TextField),
    Attachment(FileSlot),
}

/// Schema entry for a text field.
#[derive(Debug)]
pub struct TextSpec {
    pub field: TextField,
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub max_len: Option<usize>,
}

/// Schema entry for an attachment slot.
#[derive(Debug)]
pub struct FileSpec {
    pub slot: FileSlot,
    pub key: &'static str,
    pub label: &'static str,
    pub section: Section,
}

/// Form section an attachment slot is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PresentationDrawing,
    Model3d,
    Drawings,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::PresentationDrawing,
        Section::Model3d,
        Section::Drawings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::PresentationDrawing => "Presentation Drawing",
            Section::Model3d => "3D Model",
            Section::Drawings => "Drawings",
        }
    }
}

const fn text(
    field: TextField,
    key: &'static str,
    label: &'static str,
    placeholder: &'static str,
    max_len: Option<usize>,
) -> TextSpec {
    TextSpec {
        field,
        key,
        label,
        placeholder,
        max_len,
    }
}

const fn file(slot: FileSlot, key: &'static str, label: &'static str, section: Section) -> FileSpec {
    FileSpec {
        slot,
        key,
        label,
        section,
    }
}

/// Text fields in form order.
pub static TEXT_FIELDS: [TextSpec; 12] = [
    text(TextField::Title, "title", "Title", "Project Title", None),
    text(TextField::ClientName, "clientName", "Client Name", "Client Name", None),
    text(TextField::ProjectType, "projectType", "Project Type", "Project Type", None),
    text(TextField::SiteAddress, "siteAddress", "Site Address", "Site Address", None),
    text(TextField::GstNo, "gstNo", "GST No", "GST No", None),
    text(TextField::MahareraNo, "mahareraNo", "Maharera No", "Maharera No", None),
    text(TextField::ProjectHead, "projectHead", "Project Head", "Project Head", None),
    text(
        TextField::RccDesignerName,
        "rccDesignerName",
        "RCC Designer Name",
        "RCC Designer Name",
        None,
    ),
    text(TextField::Pan, "pan", "PAN", "PAN", None),
    text(TextField::Aadhar, "aadhar", "Aadhar", "Enter 12-digit Aadhar", Some(12)),
    text(TextField::Pin, "pin", "Pin", "Enter 6-digit Pin", Some(6)),
    text(TextField::Email, "email", "Email", "Enter your email", None),
];

/// Attachment slots in form order.
pub static FILE_SLOTS: [FileSpec; 28] = [
    file(FileSlot::PresentationDrawing1, "Presentation_Drawing_1", "Presentation Drawing 1", Section::PresentationDrawing),
    file(FileSlot::PresentationDrawing2, "Presentation_Drawing_2", "Presentation Drawing 2", Section::PresentationDrawing),
    file(FileSlot::PresentationDrawing3, "Presentation_Drawing_3", "Presentation Drawing 3", Section::PresentationDrawing),
    file(FileSlot::FileModel3d1, "File_Model_3D_1", "File Model 3D 1", Section::Model3d),
    file(FileSlot::FileModel3d2, "File_Model_3D_2", "File Model 3D 2", Section::Model3d),
    file(FileSlot::FileModel3d3, "File_Model_3D_3", "File Model 3D 3", Section::Model3d),
    file(FileSlot::SubmissionDrawing, "Submission_Drawing", "Submission Drawing", Section::Drawings),
    file(FileSlot::AllFloorPlan, "All_Floor_Plan", "All Floor Plan", Section::Drawings),
    file(FileSlot::AllSection, "All_Section", "All Section", Section::Drawings),
    file(FileSlot::AllElevation, "All_Elevation", "All Elevation", Section::Drawings),
    file(FileSlot::Toilet, "toilet", "Toilet Layout", Section::Drawings),
    file(FileSlot::AllElectricDrawing, "All_Electric_Drawing", "All Electric Drawing", Section::Drawings),
    file(FileSlot::TileLayout, "tile_Layout", "Tile Layout", Section::Drawings),
    file(FileSlot::AllGrillsAndRailing, "All_Grills_And_Railing", "All Grills and Railing", Section::Drawings),
    file(FileSlot::ColumnFooting, "Column_Footing", "Column Footing", Section::Drawings),
    file(FileSlot::PleanthBeam, "Pleanth_Beam", "Pleanth Beam", Section::Drawings),
    file(FileSlot::StairCaseDrawing, "Stair_Case_Drawing", "Stair Case Drawing", Section::Drawings),
    file(FileSlot::Slab1, "Slab_1", "Slab 1", Section::Drawings),
    file(FileSlot::Slab2, "Slab_2", "Slab 2", Section::Drawings),
    file(FileSlot::Slab3, "Slab_3", "Slab 3", Section::Drawings),
    file(FileSlot::Slab4, "Slab_4", "Slab 4", Section::Drawings),
    file(FileSlot::Slab5, "Slab_5", "Slab 5", Section::Drawings),
    file(FileSlot::PropertyCard, "Property_Card", "Property Card", Section::Drawings),
    file(FileSlot::PropertyMap, "Property_Map", "Property Map", Section::Drawings),
    file(FileSlot::CompletionDrawing, "Completion_Drawing", "Completion Drawing", Section::Drawings),
    file(FileSlot::SanctionDrawing, "SanctionDrawing", "Sanction Drawing", Section::Drawings),
    file(FileSlot::ReviseSanction, "Revise_Sanction", "Revise Sanction", Section::Drawings),
    file(FileSlot::CompletionLetter, "Completion_Letter", "Completion Letter", Section::Drawings),
];

impl TextField {
    pub fn spec(self) -> &'static TextSpec {
        // Table order matches declaration order.
        &TEXT_FIELDS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn all() -> impl Iterator<Item = TextField> {
        TEXT_FIELDS.iter().map(|spec| spec.field)
    }
}

impl FileSlot {
    pub fn spec(self) -> &'static FileSpec {
        &FILE_SLOTS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn all() -> impl Iterator<Item = FileSlot> {
        FILE_SLOTS.iter().map(|spec| spec.slot)
    }

    /// Slots belonging to a form section, in form order.
    pub fn in_section(section: Section) -> impl Iterator<Item = FileSlot> {
        FILE_SLOTS
            .iter()
            .filter(move |spec| spec.section == section)
            .map(|spec| spec.slot)
    }
}

impl FieldSlot {
    pub fn key(self) -> &'static str {
        match self {
            FieldSlot::Text(field) => field.key(),
            FieldSlot::Attachment(slot) => slot.key(),
        }
    }

    /// Every slot of the record: text fields first, then attachments.
    pub fn all() -> impl Iterator<Item = FieldSlot> {
        TextField::all()
            .map(FieldSlot::Text)
            .chain(FileSlot::all().map(FieldSlot::Attachment))
    }

    /// Look up a slot by its wire key.
    #[cfg(test)]
    pub fn from_key(key: &str) -> Option<FieldSlot> {
        Self::all().find(|slot| slot.key() == key)
    }
}

impl fmt::Display for FieldSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_follow_declaration_order() {
        for (idx, spec) in TEXT_FIELDS.iter().enumerate() {
            assert_eq!(spec.field as usize, idx, "text table out of order at {}", spec.key);
        }
        for (idx, spec) in FILE_SLOTS.iter().enumerate() {
            assert_eq!(spec.slot as usize, idx, "file table out of order at {}", spec.key);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<&str> = FieldSlot::all().map(FieldSlot::key).collect();
        assert_eq!(keys.len(), 40);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(
            FieldSlot::from_key("clientName"),
            Some(FieldSlot::Text(TextField::ClientName))
        );
        assert_eq!(
            FieldSlot::from_key("File_Model_3D_2"),
            Some(FieldSlot::Attachment(FileSlot::FileModel3d2))
        );
        assert_eq!(FieldSlot::from_key("unknown"), None);
    }

    #[test]
    fn test_sections_cover_every_slot() {
        let total: usize = Section::ALL
            .iter()
            .map(|section| FileSlot::in_section(*section).count())
            .sum();
        assert_eq!(total, FILE_SLOTS.len());
        assert_eq!(FileSlot::in_section(Section::PresentationDrawing).count(), 3);
        assert_eq!(FileSlot::in_section(Section::Model3d).count(), 3);
    }
}
