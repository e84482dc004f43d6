use std::collections::BTreeMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use time::OffsetDateTime;
use crate::helpers::date_format::display_date;
use crate::models::deserialize_id;
use crate::table::filter::Filterable;
use crate::views::form::{FieldValues, FormError, FormField};

pub const HOTEL_TYPES: &[(&str, &str)] = &[
    ("luxury", "Luxury"),
    ("business", "Business"),
    ("budget", "Budget"),
    ("resort", "Resort"),
    ("boutique", "Boutique"),
];

pub const CAR_TYPES: &[(&str, &str)] = &[
    ("sedan", "Sedan"),
    ("suv", "SUV"),
    ("hatchback", "Hatchback"),
    ("tempo", "Tempo Traveller"),
    ("luxury", "Luxury"),
];

pub const TRANSMISSIONS: &[(&str, &str)] = &[
    ("Manual", "Manual"),
    ("Automatic", "Automatic"),
    ("Semi-Automatic", "Semi-Automatic"),
];

pub const FUELS: &[(&str, &str)] = &[
    ("Petrol", "Petrol"),
    ("Diesel", "Diesel"),
    ("Electric", "Electric"),
    ("Hybrid", "Hybrid"),
    ("CNG", "CNG"),
];

pub const DEFAULT_PRICE_UNIT: &str = "per day";

/// Arrays and objects are stored by the backend either natively or as JSON text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded<T> {
    Native(T),
    Encoded(String),
}

fn deserialize_embedded<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Embedded<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(Embedded::Native(value)) => Ok(value),
        Some(Embedded::Encoded(text)) if text.trim().is_empty() => Ok(T::default()),
        Some(Embedded::Encoded(text)) => serde_json::from_str(&text).map_err(D::Error::custom),
    }
}

/// `₹2500`, or `₹2500.5` when there are paise.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

fn date_added(created_at: Option<OffsetDateTime>) -> String {
    created_at
        .map(|created_at| display_date(created_at.date()))
        .unwrap_or_else(|| "Not specified".to_string())
}

#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub price: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_embedded")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_embedded")]
    pub images: Vec<String>,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub provider_email: String,
    #[serde(default)]
    pub provider_phone: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Specifications {
    pub engine: String,
    pub mileage: String,
    pub transmission: String,
    pub fuel_type: String,
    pub seating_capacity: String,
    pub boot_space: String,
    pub length: String,
    pub width: String,
    pub height: String,
}

/// Form input name and label for every specification entry.
const SPECIFICATION_FIELDS: [(&str, &str); 9] = [
    ("specEngine", "Engine"),
    ("specMileage", "Mileage"),
    ("specTransmission", "Transmission Details"),
    ("specFuelType", "Fuel Type Details"),
    ("specSeatingCapacity", "Seating Capacity"),
    ("specBootSpace", "Boot Space"),
    ("specLength", "Length"),
    ("specWidth", "Width"),
    ("specHeight", "Height"),
];

impl Specifications {
    fn entries(&self) -> [&String; 9] {
        [
            &self.engine,
            &self.mileage,
            &self.transmission,
            &self.fuel_type,
            &self.seating_capacity,
            &self.boot_space,
            &self.length,
            &self.width,
            &self.height,
        ]
    }

    fn from_values(values: &FieldValues) -> Self {
        let [engine, mileage, transmission, fuel_type, seating_capacity, boot_space, length, width, height] =
            SPECIFICATION_FIELDS.map(|(name, _)| values.optional(name));
        Self {
            engine,
            mileage,
            transmission,
            fuel_type,
            seating_capacity,
            boot_space,
            length,
            width,
            height,
        }
    }
}

#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarRental {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub car_type: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_unit: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub seating: Option<u32>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub ac: bool,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub fuel: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_embedded")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_embedded")]
    pub specifications: Specifications,
    #[serde(default, deserialize_with = "deserialize_embedded")]
    pub images: Vec<String>,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub provider_email: String,
    #[serde(default)]
    pub provider_phone: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl CarRental {
    pub fn price_unit(&self) -> &str {
        match self.price_unit.as_deref() {
            Some(unit) if !unit.trim().is_empty() => unit,
            _ => DEFAULT_PRICE_UNIT,
        }
    }
}

/// Everything that differs between the hotel and the car rental management pages.
pub trait ListingKind: Filterable + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path segment under `/listings`.
    const SLUG: &'static str;
    const RESOURCE: &'static str;
    const TITLE: &'static str;
    /// Lower-case noun used inside sentences, e.g. "car rental".
    const NOUN: &'static str;
    /// What the mandatory image should show, e.g. "car".
    const IMAGE_SUBJECT: &'static str;
    const CREATED_MESSAGE: &'static str;
    const UPDATED_MESSAGE: &'static str;
    const DELETED_MESSAGE: &'static str;
    const EXPORT_STEM: &'static str;
    const TABLE_HEADERS: &'static [&'static str];
    const CSV_HEADERS: &'static [&'static str];

    fn id(&self) -> &str;

    fn images(&self) -> &[String];

    fn display_name(&self) -> &str;

    /// Values an empty form starts from.
    fn blank_values() -> BTreeMap<String, String>;

    /// Values of the form when editing this listing.
    fn form_values(&self) -> BTreeMap<String, String>;

    fn form_fields(values: &BTreeMap<String, String>) -> Vec<FormField>;

    /// Validated text parts of the multipart body, in the order the backend expects them.
    fn multipart_fields(values: &BTreeMap<String, String>) -> Result<Vec<(&'static str, String)>, FormError>;

    fn table_cells(&self) -> Vec<String>;

    fn csv_record(&self) -> Vec<String>;
}

fn value_of(values: &BTreeMap<String, String>, name: &str) -> String {
    values.get(name).cloned().unwrap_or_default()
}

fn owned_values<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

struct HotelForm {
    name: String,
    location: String,
    price: f64,
    rating: f64,
    kind: String,
    description: String,
    amenities: Vec<String>,
    provider_name: String,
    provider_email: String,
    provider_phone: String,
}

impl HotelForm {
    fn from_values(values: &FieldValues) -> Result<Self, FormError> {
        let name = values.required("name", "Hotel name")?;
        let location = values.required("location", "Location")?;
        let price = values.number("price", "Price")?;
        let rating = values.optional_number("rating", "Rating")?.unwrap_or(0.0);
        if !(0.0..=5.0).contains(&rating) {
            return Err(FormError::OutOfRange {
                field: "Rating",
                min: 0,
                max: 5,
            });
        }
        let kind = values.choice("type", "Hotel type", HOTEL_TYPES)?;

        Ok(Self {
            name,
            location,
            price,
            rating,
            kind,
            description: values.optional("description"),
            amenities: values.lines("amenities"),
            provider_name: values.required("providerName", "Provider name")?,
            provider_email: values.required("providerEmail", "Provider email")?,
            provider_phone: values.required("providerPhone", "Provider phone")?,
        })
    }

    fn into_parts(self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name),
            ("location", self.location),
            ("price", format_amount(self.price)),
            ("rating", format_amount(self.rating)),
            ("type", self.kind),
            ("description", self.description),
            ("amenities", serde_json::Value::from(self.amenities).to_string()),
            ("providerName", self.provider_name),
            ("providerEmail", self.provider_email),
            ("providerPhone", self.provider_phone),
        ]
    }
}

impl ListingKind for Hotel {
    const SLUG: &'static str = "hotels";
    const RESOURCE: &'static str = "hotels-list";
    const TITLE: &'static str = "Hotels";
    const NOUN: &'static str = "hotel";
    const IMAGE_SUBJECT: &'static str = "hotel";
    const CREATED_MESSAGE: &'static str = "Your hotel has been added successfully!";
    const UPDATED_MESSAGE: &'static str = "Hotel updated successfully!";
    const DELETED_MESSAGE: &'static str = "Hotel deleted successfully";
    const EXPORT_STEM: &'static str = "hotels-export";
    const TABLE_HEADERS: &'static [&'static str] =
        &["Image", "Name", "Location", "Price", "Type", "Rating", "Provider", "Date Added"];
    const CSV_HEADERS: &'static [&'static str] = &[
        "Name",
        "Location",
        "Price",
        "Type",
        "Rating",
        "Provider",
        "Email",
        "Phone",
        "Date Added",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn images(&self) -> &[String] {
        &self.images
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn blank_values() -> BTreeMap<String, String> {
        owned_values([("rating", "0".to_string())])
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        owned_values([
            ("name", self.name.clone()),
            ("location", self.location.clone()),
            ("price", format_amount(self.price)),
            ("rating", format_amount(self.rating)),
            ("type", self.kind.clone()),
            ("description", self.description.clone()),
            ("amenities", self.amenities.join("\n")),
            ("providerName", self.provider_name.clone()),
            ("providerEmail", self.provider_email.clone()),
            ("providerPhone", self.provider_phone.clone()),
        ])
    }

    fn form_fields(values: &BTreeMap<String, String>) -> Vec<FormField> {
        vec![
            FormField::text("name", "Hotel Name", value_of(values, "name")).required(),
            FormField::text("location", "Location", value_of(values, "location")).required(),
            FormField::number("price", "Price per Night (₹)", value_of(values, "price")).required(),
            FormField::number("rating", "Rating (0-5)", value_of(values, "rating")),
            FormField::select("type", "Hotel Type", value_of(values, "type"), HOTEL_TYPES).required(),
            FormField::textarea("description", "Description", value_of(values, "description")),
            FormField::textarea("amenities", "Amenities (one per line)", value_of(values, "amenities")),
            FormField::text("providerName", "Provider Name", value_of(values, "providerName")).required(),
            FormField::email("providerEmail", "Provider Email", value_of(values, "providerEmail")).required(),
            FormField::tel("providerPhone", "Provider Phone", value_of(values, "providerPhone")).required(),
        ]
    }

    fn multipart_fields(values: &BTreeMap<String, String>) -> Result<Vec<(&'static str, String)>, FormError> {
        HotelForm::from_values(&FieldValues(values)).map(HotelForm::into_parts)
    }

    fn table_cells(&self) -> Vec<String> {
        vec![
            self.images.first().cloned().unwrap_or_default(),
            self.name.clone(),
            self.location.clone(),
            format!("₹{}", format_amount(self.price)),
            self.kind.clone(),
            format_amount(self.rating),
            self.provider_name.clone(),
            date_added(self.created_at),
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.location.clone(),
            format!("₹{}", format_amount(self.price)),
            self.kind.clone(),
            format_amount(self.rating),
            self.provider_name.clone(),
            self.provider_email.clone(),
            self.provider_phone.clone(),
            date_added(self.created_at),
        ]
    }
}

struct CarRentalForm {
    title: String,
    car_type: String,
    price: f64,
    price_unit: String,
    seating: Option<f64>,
    ac: bool,
    transmission: String,
    fuel: String,
    description: String,
    features: Vec<String>,
    specifications: Specifications,
    provider_name: String,
    provider_email: String,
    provider_phone: String,
}

impl CarRentalForm {
    fn from_values(values: &FieldValues) -> Result<Self, FormError> {
        let title = values.required("title", "Car title")?;
        let car_type = values.choice("carType", "Car type", CAR_TYPES)?;
        let price = values.number("price", "Price")?;
        let seating = values.optional_number("seating", "Seating")?;
        let transmission = match values.optional("transmission") {
            value if value.is_empty() => value,
            _ => values.choice("transmission", "Transmission", TRANSMISSIONS)?,
        };
        let fuel = match values.optional("fuel") {
            value if value.is_empty() => value,
            _ => values.choice("fuel", "Fuel", FUELS)?,
        };
        let price_unit = match values.optional("priceUnit") {
            unit if unit.is_empty() => DEFAULT_PRICE_UNIT.to_string(),
            unit => unit,
        };

        Ok(Self {
            title,
            car_type,
            price,
            price_unit,
            seating,
            ac: values.flag("ac"),
            transmission,
            fuel,
            description: values.optional("description"),
            features: values.lines("features"),
            specifications: Specifications::from_values(values),
            provider_name: values.required("providerName", "Provider name")?,
            provider_email: values.required("providerEmail", "Provider email")?,
            provider_phone: values.required("providerPhone", "Provider phone")?,
        })
    }

    fn into_parts(self) -> Vec<(&'static str, String)> {
        let specifications = json!({
            "engine": self.specifications.engine,
            "mileage": self.specifications.mileage,
            "transmission": self.specifications.transmission,
            "fuelType": self.specifications.fuel_type,
            "seatingCapacity": self.specifications.seating_capacity,
            "bootSpace": self.specifications.boot_space,
            "length": self.specifications.length,
            "width": self.specifications.width,
            "height": self.specifications.height,
        });

        vec![
            ("title", self.title),
            ("carType", self.car_type),
            ("price", format_amount(self.price)),
            ("priceUnit", self.price_unit),
            ("seating", self.seating.map(format_amount).unwrap_or_default()),
            ("ac", self.ac.to_string()),
            ("transmission", self.transmission),
            ("fuel", self.fuel),
            ("description", self.description),
            ("features", serde_json::Value::from(self.features).to_string()),
            ("specifications", specifications.to_string()),
            ("providerName", self.provider_name),
            ("providerEmail", self.provider_email),
            ("providerPhone", self.provider_phone),
        ]
    }
}

impl ListingKind for CarRental {
    const SLUG: &'static str = "car-rentals";
    const RESOURCE: &'static str = "car-rentals";
    const TITLE: &'static str = "Car Rentals";
    const NOUN: &'static str = "car rental";
    const IMAGE_SUBJECT: &'static str = "car";
    const CREATED_MESSAGE: &'static str = "Your car rental has been added successfully!";
    const UPDATED_MESSAGE: &'static str = "Car rental updated successfully!";
    const DELETED_MESSAGE: &'static str = "Car rental deleted successfully";
    const EXPORT_STEM: &'static str = "car-rentals-export";
    const TABLE_HEADERS: &'static [&'static str] =
        &["Image", "Title", "Type", "Price", "Seating", "Provider", "Date Added"];
    const CSV_HEADERS: &'static [&'static str] =
        &["Title", "Type", "Price", "Provider", "Email", "Phone", "Date Added"];

    fn id(&self) -> &str {
        &self.id
    }

    fn images(&self) -> &[String] {
        &self.images
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn blank_values() -> BTreeMap<String, String> {
        owned_values([
            ("priceUnit", DEFAULT_PRICE_UNIT.to_string()),
            ("ac", "true".to_string()),
        ])
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        let mut values = owned_values([
            ("title", self.title.clone()),
            ("carType", self.car_type.clone()),
            ("price", format_amount(self.price)),
            ("priceUnit", self.price_unit().to_string()),
            ("seating", self.seating.map(|seating| seating.to_string()).unwrap_or_default()),
            ("ac", (if self.ac { "true" } else { "" }).to_string()),
            ("transmission", self.transmission.clone()),
            ("fuel", self.fuel.clone()),
            ("description", self.description.clone()),
            ("features", self.features.join("\n")),
            ("providerName", self.provider_name.clone()),
            ("providerEmail", self.provider_email.clone()),
            ("providerPhone", self.provider_phone.clone()),
        ]);
        for ((name, _), value) in SPECIFICATION_FIELDS.iter().zip(self.specifications.entries()) {
            values.insert(name.to_string(), value.clone());
        }
        values
    }

    fn form_fields(values: &BTreeMap<String, String>) -> Vec<FormField> {
        let mut fields = vec![
            FormField::text("title", "Car Title", value_of(values, "title")).required(),
            FormField::select("carType", "Car Type", value_of(values, "carType"), CAR_TYPES).required(),
            FormField::number("price", "Price (₹)", value_of(values, "price")).required(),
            FormField::text("priceUnit", "Price Unit", value_of(values, "priceUnit")),
            FormField::number("seating", "Seating Capacity", value_of(values, "seating")),
            FormField::select(
                "transmission",
                "Transmission",
                value_of(values, "transmission"),
                TRANSMISSIONS,
            ),
            FormField::select("fuel", "Fuel Type", value_of(values, "fuel"), FUELS),
            FormField::checkbox("ac", "Air Conditioned", !value_of(values, "ac").is_empty()),
            FormField::textarea("description", "Description", value_of(values, "description")),
            FormField::textarea("features", "Features (one per line)", value_of(values, "features")),
        ];
        fields.extend(
            SPECIFICATION_FIELDS
                .iter()
                .map(|(name, label)| FormField::text(*name, *label, value_of(values, name))),
        );
        fields.extend([
            FormField::text("providerName", "Provider Name", value_of(values, "providerName")).required(),
            FormField::email("providerEmail", "Provider Email", value_of(values, "providerEmail")).required(),
            FormField::tel("providerPhone", "Provider Phone", value_of(values, "providerPhone")).required(),
        ]);
        fields
    }

    fn multipart_fields(values: &BTreeMap<String, String>) -> Result<Vec<(&'static str, String)>, FormError> {
        CarRentalForm::from_values(&FieldValues(values)).map(CarRentalForm::into_parts)
    }

    fn table_cells(&self) -> Vec<String> {
        vec![
            self.images.first().cloned().unwrap_or_default(),
            self.title.clone(),
            self.car_type.clone(),
            format!("₹{} {}", format_amount(self.price), self.price_unit()),
            self.seating.map(|seating| seating.to_string()).unwrap_or_default(),
            self.provider_name.clone(),
            date_added(self.created_at),
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.car_type.clone(),
            format!("₹{} {}", format_amount(self.price), self.price_unit()),
            self.provider_name.clone(),
            self.provider_email.clone(),
            self.provider_phone.clone(),
            date_added(self.created_at),
        ]
    }
}
