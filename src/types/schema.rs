use serde_json::{Map, Value};

use crate::errors::internal::RecordError;
use crate::stores::tabular::{ColumnRange, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, stored verbatim
    Text,
    /// Positive base-10 integer, rejected otherwise
    Quantity,
    /// Computed on write, never accepted from input
    Derived,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

const fn text(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Text, required: true }
}

const fn optional(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Text, required: false }
}

const fn quantity(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Quantity, required: true }
}

const fn derived(name: &'static str) -> Column {
    Column { name, kind: ColumnKind::Derived, required: false }
}

const ID: Column = Column { name: "id", kind: ColumnKind::Text, required: false };

/// amount = quantity × unit_price, fixed at write time
#[derive(Debug, Clone, Copy)]
pub struct DerivedFee {
    pub quantity: &'static str,
    pub amount: &'static str,
    pub unit_price: u64,
    pub invalid_quantity_message: &'static str,
}

/// Declarative description of one case-filing table
///
/// Column order is the stored row layout; column A is always `id`.
#[derive(Debug)]
pub struct EntitySchema {
    pub slug: &'static str,
    pub table: &'static str,
    pub activity_label: &'static str,
    pub stats_key: &'static str,
    pub columns: &'static [Column],
    pub date_column: &'static str,
    pub search_columns: &'static [&'static str],
    pub derived: Option<DerivedFee>,
    pub required_message: &'static str,
    pub created_message: &'static str,
}

pub const HARGA_PER_LEMBAR: u64 = 500;
pub const HARGA_PER_BANDEL: u64 = 10_000;

pub static SALINAN_PUTUSAN: EntitySchema = EntitySchema {
    slug: "salinan-putusan",
    table: "form_register_salinan_putusan",
    activity_label: "SALINAN PUTUSAN",
    stats_key: "salinanPutusan",
    columns: &[
        ID,
        text("tanggal_input"),
        text("nama_pihak"),
        text("nomor_perkara"),
        quantity("jumlah_lembaran"),
        derived("harga_pnbp"),
        optional("keterangan"),
    ],
    date_column: "tanggal_input",
    search_columns: &["nama_pihak", "nomor_perkara"],
    derived: Some(DerivedFee {
        quantity: "jumlah_lembaran",
        amount: "harga_pnbp",
        unit_price: HARGA_PER_LEMBAR,
        invalid_quantity_message: "Jumlah lembaran harus angka positif.",
    }),
    required_message: "Semua kolom wajib diisi kecuali keterangan.",
    created_message: "Data berhasil dibuat.",
};

pub static WARMEKING: EntitySchema = EntitySchema {
    slug: "warmeking",
    table: "form_register_warmeking",
    activity_label: "WARMEKING",
    stats_key: "warmeking",
    columns: &[
        ID,
        text("tanggal_input"),
        text("permohonan_tentang"),
        text("nama_pewaris"),
        text("nama_ahli_waris"),
        optional("keterangan"),
    ],
    date_column: "tanggal_input",
    search_columns: &["permohonan_tentang", "nama_pewaris", "nama_ahli_waris"],
    derived: None,
    required_message: "Semua kolom wajib diisi kecuali keterangan.",
    created_message: "Data warmeking berhasil dibuat.",
};

pub static SURAT_KUASA_INSIDENTIL: EntitySchema = EntitySchema {
    slug: "surat-kuasa-insidentil",
    table: "form_register_surat_kuasa_insidentil",
    activity_label: "SK INSIDENTIL",
    stats_key: "suratKuasaInsidentil",
    columns: &[
        ID,
        text("tanggal_input"),
        text("insidentil"),
        text("nama_penerima"),
        text("nama_pemberi_kuasa"),
        optional("perkara_pn"),
        optional("perkara_pt"),
        optional("perkara_ma"),
        optional("keterangan"),
    ],
    date_column: "tanggal_input",
    search_columns: &["insidentil", "nama_penerima", "nama_pemberi_kuasa", "perkara_pn"],
    derived: None,
    required_message:
        "Kolom Tanggal Input, Insidentil, Nama Penerima, dan Nama Pemberi Kuasa wajib diisi.",
    created_message: "Data surat kuasa insidentil berhasil dibuat.",
};

pub static SURAT_KUASA_KHUSUS: EntitySchema = EntitySchema {
    slug: "surat-kuasa-khusus",
    table: "form_register_surat_kuasa_khusus",
    activity_label: "SK KHUSUS",
    stats_key: "suratKuasaKhusus",
    columns: &[
        ID,
        text("tanggal"),
        text("nama_penerima_kuasa"),
        text("nama_pemberi_kuasa"),
        optional("perkara_pn"),
        optional("perkara_pt"),
        optional("perkara_ma"),
        optional("keterangan"),
    ],
    date_column: "tanggal",
    search_columns: &["nama_penerima_kuasa", "nama_pemberi_kuasa", "perkara_pn"],
    derived: None,
    required_message: "Kolom Tanggal, Nama Penerima Kuasa, dan Nama Pemberi Kuasa wajib diisi.",
    created_message: "Data surat kuasa khusus berhasil dibuat.",
};

pub static SURAT_KETERANGAN_TIDAK_DIPIDANA: EntitySchema = EntitySchema {
    slug: "surat-keterangan-tidak-dipidana",
    table: "form_register_surat_keterangan_tidak_dipidana",
    activity_label: "SK TIDAK DIPIDANA",
    stats_key: "skTidakDipidana",
    columns: &[
        ID,
        text("tanggal_input"),
        text("nomor_sk"),
        text("nama_pemohon"),
        text("alamat_pemohon"),
        optional("keterangan"),
    ],
    date_column: "tanggal_input",
    search_columns: &["nomor_sk", "nama_pemohon"],
    derived: None,
    required_message: "Kolom Tanggal, Nomor SK, Nama, dan Alamat wajib diisi.",
    created_message: "Data berhasil dibuat.",
};

pub static SURAT_LEGALISASI: EntitySchema = EntitySchema {
    slug: "surat-legalisasi",
    table: "form_register_surat_legalisasi",
    activity_label: "SURAT LEGALISASI",
    stats_key: "suratLegalisasi",
    columns: &[
        ID,
        text("tanggal"),
        text("nomor_perkara"),
        quantity("jumlah_bandel"),
        derived("total_setoran"),
        optional("keterangan"),
    ],
    date_column: "tanggal",
    search_columns: &["nomor_perkara"],
    derived: Some(DerivedFee {
        quantity: "jumlah_bandel",
        amount: "total_setoran",
        unit_price: HARGA_PER_BANDEL,
        invalid_quantity_message: "Jumlah bandel harus angka positif.",
    }),
    required_message: "Kolom Tanggal, Nomor Perkara, dan Jumlah Bandel wajib diisi.",
    created_message: "Data legalisasi berhasil dibuat.",
};

/// Every case-filing schema, in dashboard order
pub static ALL_ENTITIES: [&EntitySchema; 6] = [
    &SALINAN_PUTUSAN,
    &WARMEKING,
    &SURAT_KUASA_INSIDENTIL,
    &SURAT_KUASA_KHUSUS,
    &SURAT_KETERANGAN_TIDAK_DIPIDANA,
    &SURAT_LEGALISASI,
];

pub fn entity_by_slug(slug: &str) -> Option<&'static EntitySchema> {
    ALL_ENTITIES.iter().copied().find(|s| s.slug == slug)
}

/// Stringify a JSON input value for storage
fn input_to_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn parse_quantity(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().filter(|q| *q > 0),
        Value::String(s) => s.trim().parse::<u64>().ok().filter(|q| *q > 0),
        _ => None,
    }
}

impl EntitySchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_range(&self) -> ColumnRange {
        ColumnRange::leading(self.width())
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell for a named column, empty when the row is short
    pub fn cell<'r>(&self, row: &'r Row, name: &str) -> &'r str {
        self.column_index(name)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Positional row → named record
    ///
    /// Quantity and derived cells are emitted as numbers when they parse,
    /// otherwise the stored text is passed through unchanged.
    pub fn to_record(&self, row: &Row) -> Map<String, Value> {
        let mut record = Map::new();
        for (i, column) in self.columns.iter().enumerate() {
            let raw = row.get(i).map(String::as_str).unwrap_or("");
            let value = match column.kind {
                ColumnKind::Text => Value::String(raw.to_string()),
                ColumnKind::Quantity | ColumnKind::Derived => raw
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(raw.to_string())),
            };
            record.insert(column.name.to_string(), value);
        }
        record
    }

    /// Validate input and lay it out as a row with `id` in column A
    ///
    /// Fails before anything touches the store.
    pub fn build_row(&self, id: &str, input: &Map<String, Value>) -> Result<Row, RecordError> {
        let missing = self.columns.iter().skip(1).any(|column| {
            column.required && input_to_cell(input.get(column.name)).trim().is_empty()
        });
        if missing {
            return Err(RecordError::validation(self.required_message));
        }

        let fee = match &self.derived {
            Some(derived) => {
                let qty = parse_quantity(input.get(derived.quantity))
                    .ok_or_else(|| RecordError::validation(derived.invalid_quantity_message))?;
                Some((qty, qty.saturating_mul(derived.unit_price)))
            }
            None => None,
        };

        let mut row = Vec::with_capacity(self.width());
        for column in self.columns {
            let cell = match column.kind {
                _ if column.name == "id" => id.to_string(),
                ColumnKind::Text => input_to_cell(input.get(column.name)),
                ColumnKind::Quantity => match fee {
                    Some((qty, _)) => qty.to_string(),
                    None => parse_quantity(input.get(column.name))
                        .map(|q| q.to_string())
                        .ok_or_else(|| {
                            RecordError::validation(format!("{} harus angka positif.", column.name))
                        })?,
                },
                ColumnKind::Derived => fee.map(|(_, amount)| amount.to_string()).unwrap_or_default(),
            };
            row.push(cell);
        }
        Ok(row)
    }

    /// Whether the row matches the query's free-text search
    pub fn search_fields<'r>(&'r self, row: &'r Row) -> impl Iterator<Item = &'r str> + 'r {
        self.search_columns.iter().map(move |name| self.cell(row, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_every_schema_starts_with_id_and_has_its_search_columns() {
        for schema in ALL_ENTITIES {
            assert_eq!(schema.columns[0].name, "id", "{}", schema.slug);
            assert!(schema.column_index(schema.date_column).is_some(), "{}", schema.slug);
            for name in schema.search_columns {
                assert!(schema.column_index(name).is_some(), "{} {}", schema.slug, name);
            }
            assert_eq!(entity_by_slug(schema.slug).map(|s| s.table), Some(schema.table));
        }
    }

    #[test]
    fn test_column_ranges_match_layouts() {
        assert_eq!(SALINAN_PUTUSAN.column_range().a1(), "A:G");
        assert_eq!(WARMEKING.column_range().a1(), "A:F");
        assert_eq!(SURAT_KUASA_INSIDENTIL.column_range().a1(), "A:I");
        assert_eq!(SURAT_KUASA_KHUSUS.column_range().a1(), "A:H");
        assert_eq!(SURAT_KETERANGAN_TIDAK_DIPIDANA.column_range().a1(), "A:F");
        assert_eq!(SURAT_LEGALISASI.column_range().a1(), "A:F");
    }

    #[test]
    fn test_build_row_computes_fee() {
        let row = SALINAN_PUTUSAN
            .build_row(
                "id-1",
                &input(json!({
                    "tanggal_input": "2024-03-01",
                    "nama_pihak": "Budi",
                    "nomor_perkara": "12/Pdt.G/2024",
                    "jumlah_lembaran": 4,
                    "harga_pnbp": 1
                })),
            )
            .unwrap();

        assert_eq!(row, vec!["id-1", "2024-03-01", "Budi", "12/Pdt.G/2024", "4", "2000", ""]);
    }

    #[test]
    fn test_build_row_accepts_numeric_strings() {
        let row = SURAT_LEGALISASI
            .build_row(
                "id-2",
                &input(json!({"tanggal": "2024-03-01", "nomor_perkara": "7/Pid", "jumlah_bandel": " 3 "})),
            )
            .unwrap();

        assert_eq!(row[3], "3");
        assert_eq!(row[4], "30000");
    }

    #[test]
    fn test_build_row_rejects_bad_quantity() {
        for bad in [json!(0), json!(-2), json!("abc"), json!(2.5), json!("")] {
            let result = SALINAN_PUTUSAN.build_row(
                "id",
                &input(json!({
                    "tanggal_input": "2024-03-01",
                    "nama_pihak": "Budi",
                    "nomor_perkara": "1",
                    "jumlah_lembaran": bad
                })),
            );
            assert!(result.is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_build_row_requires_fields() {
        let err = WARMEKING
            .build_row(
                "id",
                &input(json!({"tanggal_input": "2024-03-01", "permohonan_tentang": "   "})),
            )
            .unwrap_err();

        assert_eq!(err, RecordError::validation("Semua kolom wajib diisi kecuali keterangan."));
    }

    #[test]
    fn test_to_record_fills_missing_cells() {
        let row: Row = vec!["id-1".into(), "2024-03-01".into(), "Budi".into(), "1/X".into(), "4".into(), "2000".into()];

        let record = SALINAN_PUTUSAN.to_record(&row);
        assert_eq!(record["jumlah_lembaran"], json!(4));
        assert_eq!(record["harga_pnbp"], json!(2000));
        assert_eq!(record["keterangan"], json!(""));
    }

    #[test]
    fn test_to_record_passes_through_unparsable_amounts() {
        let row: Row = vec!["id-1".into(), "2024-03-01".into(), "1/X".into(), "lima".into()];

        let record = SURAT_LEGALISASI.to_record(&row);
        assert_eq!(record["jumlah_bandel"], json!("lima"));
        assert_eq!(record["total_setoran"], json!(""));
    }
}
