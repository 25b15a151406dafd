use serde::{Deserialize, Serialize};

/// Column header of every persisted file, in write order
pub const CSV_COLUMNS: [&str; 24] = [
    "scrape_date",
    "hash_id",
    "name",
    "locality",
    "district",
    "neighborhood",
    "price_czk",
    "size_m2",
    "rooms",
    "floor",
    "building_type",
    "condition",
    "furnished",
    "elevator",
    "balcony",
    "terrace",
    "energy_rating",
    "ownership",
    "parking",
    "cellar",
    "loggia",
    "heating",
    "apartment_type",
    "note_about_price",
];

/// Fixed-schema row persisted per listing.
///
/// Field order is the column order. Unresolved fields stay empty strings so every row
/// has the full column set; missing columns in older files read back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRecord {
    pub scrape_date: String,
    pub hash_id: String,
    pub name: String,
    pub locality: String,
    pub district: String,
    pub neighborhood: String,
    pub price_czk: String,
    pub size_m2: String,
    pub rooms: String,
    pub floor: String,
    pub building_type: String,
    pub condition: String,
    pub furnished: String,
    pub elevator: String,
    pub balcony: String,
    pub terrace: String,
    pub energy_rating: String,
    pub ownership: String,
    pub parking: String,
    pub cellar: String,
    pub loggia: String,
    pub heating: String,
    pub apartment_type: String,
    pub note_about_price: String,
}

/// Normalized detail columns, one per synonym map entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    SizeM2,
    Floor,
    BuildingType,
    Condition,
    Furnished,
    Elevator,
    Balcony,
    Terrace,
    EnergyRating,
    Ownership,
    Parking,
    Cellar,
    Loggia,
    Heating,
    ApartmentType,
    NoteAboutPrice,
}

impl AttributeField {
    pub fn column(&self) -> &'static str {
        match self {
            AttributeField::SizeM2 => "size_m2",
            AttributeField::Floor => "floor",
            AttributeField::BuildingType => "building_type",
            AttributeField::Condition => "condition",
            AttributeField::Furnished => "furnished",
            AttributeField::Elevator => "elevator",
            AttributeField::Balcony => "balcony",
            AttributeField::Terrace => "terrace",
            AttributeField::EnergyRating => "energy_rating",
            AttributeField::Ownership => "ownership",
            AttributeField::Parking => "parking",
            AttributeField::Cellar => "cellar",
            AttributeField::Loggia => "loggia",
            AttributeField::Heating => "heating",
            AttributeField::ApartmentType => "apartment_type",
            AttributeField::NoteAboutPrice => "note_about_price",
        }
    }
}

impl CanonicalRecord {
    pub fn field_mut(&mut self, field: AttributeField) -> &mut String {
        match field {
            AttributeField::SizeM2 => &mut self.size_m2,
            AttributeField::Floor => &mut self.floor,
            AttributeField::BuildingType => &mut self.building_type,
            AttributeField::Condition => &mut self.condition,
            AttributeField::Furnished => &mut self.furnished,
            AttributeField::Elevator => &mut self.elevator,
            AttributeField::Balcony => &mut self.balcony,
            AttributeField::Terrace => &mut self.terrace,
            AttributeField::EnergyRating => &mut self.energy_rating,
            AttributeField::Ownership => &mut self.ownership,
            AttributeField::Parking => &mut self.parking,
            AttributeField::Cellar => &mut self.cellar,
            AttributeField::Loggia => &mut self.loggia,
            AttributeField::Heating => &mut self.heating,
            AttributeField::ApartmentType => &mut self.apartment_type,
            AttributeField::NoteAboutPrice => &mut self.note_about_price,
        }
    }
}
