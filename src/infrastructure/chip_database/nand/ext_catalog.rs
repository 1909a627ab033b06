//! Extension catalog loader (component C): a JSON
//! document keyed by `/vendors/<vendor-id>` that lets a user add parts
//! the built-in catalog doesn't know about, without recompiling. Missing
//! the file on disk is not this module's problem (that's a CLI/config
//! concern) — this module only knows how to turn catalog
//! *text* into `VendorDef`s.

use std::collections::HashMap;

use serde::Deserialize;

use super::vendor_def::VendorDef;
use crate::domain::nand::part::{flags as part_flags, ClockTable, OpcodeTable, QeType};
use crate::domain::nand::{BbmConfig, EccConfig, FlashId, IdFraming, LayoutEntry, LayoutEntryType, MemoryOrg, Part, PageLayout};
use crate::domain::spi_mem::IoType;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    vendors: HashMap<String, VendorDto>,
    #[serde(rename = "io-opcodes", default)]
    io_opcodes: HashMap<String, HashMap<String, OpcodeEntryDto>>,
    #[serde(rename = "page-layouts", default)]
    page_layouts: HashMap<String, Vec<LayoutEntryDto>>,
    #[serde(rename = "memory-organizations", default)]
    memory_organizations: HashMap<String, MemoryOrgDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct VendorDto {
    #[serde(rename = "mfr-id")]
    mfr_id: u16,
    name: String,
    #[serde(default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PartDto {
    id: Vec<u8>,
    #[serde(default)]
    flags: Vec<String>,
    /// Accepted for schema compatibility; the core's `Part` record has
    /// no behavioral hook for per-vendor flag strings beyond the common
    /// `flags` set, so these are validated but not retained.
    #[serde(default)]
    vendor_flags: Vec<String>,
    #[serde(rename = "id-type")]
    id_type: IdTypeDto,
    #[serde(rename = "qe-type", default)]
    qe_type: QeTypeDto,
    #[serde(rename = "ecc-en-type", default)]
    ecc_en_type: Option<String>,
    #[serde(rename = "otp-ctrl-type", default)]
    otp_ctrl_type: Option<String>,
    #[serde(rename = "number-of-programs", default = "default_nops")]
    number_of_programs: u8,
    #[serde(rename = "max-speed-spi-mhz", default)]
    max_speed_spi_mhz: Option<u32>,
    #[serde(rename = "max-speed-dual-mhz", default)]
    max_speed_dual_mhz: Option<u32>,
    #[serde(rename = "max-speed-quad-mhz", default)]
    max_speed_quad_mhz: Option<u32>,
    #[serde(rename = "read-io-caps", default)]
    read_io_caps: Vec<String>,
    #[serde(rename = "pl-io-caps", default)]
    pl_io_caps: Vec<String>,
    #[serde(rename = "read-opcodes")]
    read_opcodes: OpcodesRef,
    #[serde(rename = "pl-opcodes")]
    pl_opcodes: OpcodesRef,
    #[serde(rename = "page-layout")]
    page_layout: LayoutRef,
    #[serde(rename = "memory-organization")]
    memory_organization: MemOrgRef,
    #[serde(rename = "ecc-requirement", default)]
    ecc_requirement: Option<EccReqDto>,
    #[serde(default)]
    otp: Option<OtpDto>,
    #[serde(default)]
    alias: Vec<String>,
    /// Part name: every
    /// example part object needs one to be addressable — modeled here as
    /// the map key would require a newtype-keyed map, so we ask for it
    /// explicitly instead (closest fit: `model`, read the same as the
    /// built-in catalog's `Part::model`).
    model: String,
}

fn default_nops() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum IdTypeDto {
    WithDummyByte,
    WithAddressByte,
    Direct,
}

impl From<IdTypeDto> for IdFraming {
    fn from(v: IdTypeDto) -> Self {
        match v {
            IdTypeDto::WithDummyByte => IdFraming::Dummy,
            IdTypeDto::WithAddressByte => IdFraming::Addr0,
            IdTypeDto::Direct => IdFraming::Direct,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
enum QeTypeDto {
    #[default]
    DontCare,
    CrBit0,
}

impl From<QeTypeDto> for QeType {
    fn from(v: QeTypeDto) -> Self {
        match v {
            QeTypeDto::DontCare => QeType::None,
            QeTypeDto::CrBit0 => QeType::ConfigBit(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpcodesRef {
    Named(String),
    Inline(HashMap<String, OpcodeEntryDto>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OpcodeEntryDto {
    opcode: u8,
    /// Accepted for schema fidelity; the core currently derives dummy
    /// cycles from the selected `IoType` rather than per-opcode, so this
    /// is validated (must fit a byte) but not stored on `Part`.
    #[serde(default)]
    dummy_cycles: u8,
    #[serde(default)]
    address_bytes: u8,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutRef {
    Named(String),
    Inline(Vec<LayoutEntryDto>),
}

#[derive(Debug, Clone, Deserialize)]
struct LayoutEntryDto {
    #[serde(rename = "type")]
    ty: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MemOrgRef {
    Named(String),
    Inline(MemoryOrgDto),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MemoryOrgDto {
    page_size: u32,
    oob_size: u32,
    pages_per_block: u32,
    blocks_per_lun: u32,
    #[serde(default = "one")]
    luns_per_cs: u32,
    #[serde(default = "one")]
    num_chips: u32,
    #[serde(default = "one")]
    planes_per_lun: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct EccReqDto {
    step_size: u32,
    strength_per_step: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OtpDto {
    start_index: u32,
    count: u32,
}

fn parse_io_type(name: &str) -> Result<IoType> {
    IoType::from_name(name).ok_or_else(|| Error::JsonDataInvalid(format!("unknown IO type '{name}'")))
}

fn parse_flag(name: &str) -> Result<u32> {
    Ok(match name {
        "no-pp" => part_flags::NO_PP,
        "generic-uid" => part_flags::GENERIC_UID,
        "nor-read-cap" => part_flags::NOR_READ_CAP,
        "continuous-read" => part_flags::CONTINUOUS_READ,
        "read-cache-seq" => part_flags::READ_CACHE_SEQ,
        "read-cache-random" => part_flags::READ_CACHE_RANDOM,
        "bbm-2nd-page" => part_flags::BBM_2ND_PAGE,
        "rnd-page-write" => part_flags::RND_PAGE_WRITE,
        "no-op" => part_flags::NO_OP,
        other => return Err(Error::JsonDataInvalid(format!("unknown part flag '{other}'"))),
    })
}

fn resolve_opcodes(
    r: &OpcodesRef,
    named: &HashMap<String, HashMap<String, OpcodeEntryDto>>,
) -> Result<OpcodeTable> {
    let entries = match r {
        OpcodesRef::Named(name) => named
            .get(name)
            .ok_or_else(|| Error::NotExist(format!("io-opcodes table '{name}' not found")))?,
        OpcodesRef::Inline(map) => map,
    };
    let mut table = OpcodeTable::new();
    for (io_name, entry) in entries {
        let io_type = parse_io_type(io_name)?;
        table = table.with(io_type, entry.opcode);
    }
    Ok(table)
}

fn resolve_layout(r: &LayoutRef, named: &HashMap<String, Vec<LayoutEntryDto>>) -> Result<PageLayout> {
    let entries = match r {
        LayoutRef::Named(name) => named
            .get(name)
            .ok_or_else(|| Error::NotExist(format!("page-layouts entry '{name}' not found")))?,
        LayoutRef::Inline(v) => v,
    };
    let mut out = Vec::with_capacity(entries.len());
    for e in entries {
        let entry_type = match e.ty.as_str() {
            "unused" => LayoutEntryType::Unused,
            "data" => LayoutEntryType::Data,
            "oob-data" => LayoutEntryType::OobData,
            "oob-free" => LayoutEntryType::OobFree,
            "ecc-parity" => LayoutEntryType::EccParity,
            "marker" => LayoutEntryType::Marker,
            other => return Err(Error::JsonDataInvalid(format!("unknown page-layout entry type '{other}'"))),
        };
        out.push(LayoutEntry {
            entry_type,
            byte_count: e.count,
        });
    }
    Ok(PageLayout::new(out))
}

fn resolve_memory_org(r: &MemOrgRef, named: &HashMap<String, MemoryOrgDto>) -> Result<MemoryOrg> {
    let dto = match r {
        MemOrgRef::Named(name) => named
            .get(name)
            .ok_or_else(|| Error::NotExist(format!("memory-organizations entry '{name}' not found")))?,
        MemOrgRef::Inline(d) => d,
    };
    MemoryOrg::bind(
        dto.page_size,
        dto.oob_size,
        dto.pages_per_block,
        dto.blocks_per_lun,
        dto.luns_per_cs,
        dto.num_chips,
        dto.planes_per_lun,
    )
}

fn convert_part(dto: PartDto, file: &CatalogFile) -> Result<Part> {
    if dto.id.is_empty() || dto.id.len() > crate::domain::nand::flash_id::MAX_ID_LEN {
        return Err(Error::JsonDataInvalid(format!(
            "part '{}' has an invalid id length ({})",
            dto.model,
            dto.id.len()
        )));
    }
    let mut flags = 0u32;
    for f in &dto.flags {
        flags |= parse_flag(f)?;
    }
    // vendor-flags are accepted (schema-valid strings, any content) but
    // not mapped onto anything in the core's behavior model.
    let _ = &dto.vendor_flags;

    let read_opcodes = resolve_opcodes(&dto.read_opcodes, &file.io_opcodes)?;
    let program_load_opcodes = resolve_opcodes(&dto.pl_opcodes, &file.io_opcodes)?;
    let page_layout = resolve_layout(&dto.page_layout, &file.page_layouts)?;
    let memory_org = resolve_memory_org(&dto.memory_organization, &file.memory_organizations)?;

    if page_layout.total_bytes() != memory_org.page_size + memory_org.oob_size {
        return Err(Error::JsonDataInvalid(format!(
            "part '{}': page-layout totals {} bytes but memory-organization expects {}",
            dto.model,
            page_layout.total_bytes(),
            memory_org.page_size + memory_org.oob_size
        )));
    }

    let mut max_clock = ClockTable::new();
    if let Some(mhz) = dto.max_speed_spi_mhz {
        max_clock = max_clock.with(IoType::Io111, mhz * 1_000_000);
    }
    if let Some(mhz) = dto.max_speed_dual_mhz {
        max_clock = max_clock.with(IoType::Io112, mhz * 1_000_000).with(IoType::Io122, mhz * 1_000_000);
    }
    if let Some(mhz) = dto.max_speed_quad_mhz {
        max_clock = max_clock.with(IoType::Io114, mhz * 1_000_000).with(IoType::Io144, mhz * 1_000_000);
    }
    // read-io-caps / pl-io-caps restrict which entries of read_opcodes /
    // program_load_opcodes are actually usable; unlisted IO types are
    // dropped from the resolved tables.
    let filter = |table: OpcodeTable, caps: &[String]| -> Result<OpcodeTable> {
        if caps.is_empty() {
            return Ok(table);
        }
        let allowed = caps.iter().map(|s| parse_io_type(s)).collect::<Result<Vec<_>>>()?;
        let mut filtered = OpcodeTable::new();
        for io_type in table.supported_io_types() {
            if allowed.contains(&io_type) {
                filtered = filtered.with(io_type, table.opcode_for(io_type).unwrap());
            }
        }
        Ok(filtered)
    };
    let read_opcodes = filter(read_opcodes, &dto.read_io_caps)?;
    let program_load_opcodes = filter(program_load_opcodes, &dto.pl_io_caps)?;

    let ecc = dto.ecc_requirement.map(|e| EccConfig::new(e.step_size, e.strength_per_step));
    let bbm = if flags & part_flags::BBM_2ND_PAGE != 0 {
        BbmConfig::first_or_second_page(0)
    } else {
        BbmConfig::first_page_only(0)
    };

    let _ = dto.ecc_en_type;
    let _ = dto.otp_ctrl_type;
    let _ = dto.otp;

    Ok(Part {
        model: dto.model,
        aliases: dto.alias,
        id: FlashId::new(dto.id_type.into(), &dto.id),
        memory_org,
        ecc,
        // Extension parts without a built-in decoder still bind; ECC
        // status simply comes back `None` until a matching decoder is
        // registered (`infrastructure::ecc::lookup` returns `None`).
        ecc_decoder: "ondie-generic-1bit",
        page_layout,
        bbm,
        nops_per_page: dto.number_of_programs,
        qe: dto.qe_type.into(),
        read_opcodes,
        program_load_opcodes,
        max_clock,
        flags,
    })
}

/// Parses an extension-catalog JSON document into the `VendorDef`s it
/// describes. A part that duplicates a name already present in the same
/// vendor object is rejected (`AlreadyExist`).
pub fn parse(json: &str) -> Result<Vec<VendorDef>> {
    let file: CatalogFile = serde_json::from_str(json)?;
    let mut vendors = Vec::with_capacity(file.vendors.len());
    for (vendor_id, vendor_dto) in &file.vendors {
        if vendor_dto.mfr_id == 0 || vendor_dto.mfr_id > 0xFF {
            return Err(Error::JsonDataInvalid(format!(
                "vendor '{vendor_id}': mfr-id must be in 1..=0xFF, got {}",
                vendor_dto.mfr_id
            )));
        }
        let mut seen = std::collections::HashSet::new();
        let mut parts = Vec::with_capacity(vendor_dto.parts.len());
        for part_dto in &vendor_dto.parts {
            if !seen.insert(part_dto.model.clone()) {
                return Err(Error::AlreadyExist(format!(
                    "vendor '{vendor_id}' already has a part named '{}'",
                    part_dto.model
                )));
            }
            // PartDto isn't Clone (contains non-Clone enums by design);
            // re-deserialize-free conversion needs an owned value, so we
            // clone the handful of scalar/Vec fields via a manual copy.
            parts.push(convert_part(clone_part_dto(part_dto), &file)?);
        }
        vendors.push(VendorDef::new(vendor_dto.mfr_id as u8, leak_name(&vendor_dto.name), parts));
    }
    Ok(vendors)
}

/// `VendorDef::name` is `&'static str` (it's normally a string literal in
/// a built-in vendor file); an extension vendor's name comes from JSON at
/// runtime, so it's leaked once per load. Catalogs are loaded a handful
/// of times per process (typically once, at startup), so this is a
/// deliberate, bounded trade rather than a leak in a hot loop.
fn leak_name(s: &str) -> &'static str {
    Box::leak(s.to_string().into_boxed_str())
}

fn clone_part_dto(dto: &PartDto) -> PartDto {
    PartDto {
        id: dto.id.clone(),
        flags: dto.flags.clone(),
        vendor_flags: dto.vendor_flags.clone(),
        id_type: match dto.id_type {
            IdTypeDto::WithDummyByte => IdTypeDto::WithDummyByte,
            IdTypeDto::WithAddressByte => IdTypeDto::WithAddressByte,
            IdTypeDto::Direct => IdTypeDto::Direct,
        },
        qe_type: match dto.qe_type {
            QeTypeDto::DontCare => QeTypeDto::DontCare,
            QeTypeDto::CrBit0 => QeTypeDto::CrBit0,
        },
        ecc_en_type: dto.ecc_en_type.clone(),
        otp_ctrl_type: dto.otp_ctrl_type.clone(),
        number_of_programs: dto.number_of_programs,
        max_speed_spi_mhz: dto.max_speed_spi_mhz,
        max_speed_dual_mhz: dto.max_speed_dual_mhz,
        max_speed_quad_mhz: dto.max_speed_quad_mhz,
        read_io_caps: dto.read_io_caps.clone(),
        pl_io_caps: dto.pl_io_caps.clone(),
        read_opcodes: match &dto.read_opcodes {
            OpcodesRef::Named(n) => OpcodesRef::Named(n.clone()),
            OpcodesRef::Inline(m) => OpcodesRef::Inline(m.clone()),
        },
        pl_opcodes: match &dto.pl_opcodes {
            OpcodesRef::Named(n) => OpcodesRef::Named(n.clone()),
            OpcodesRef::Inline(m) => OpcodesRef::Inline(m.clone()),
        },
        page_layout: match &dto.page_layout {
            LayoutRef::Named(n) => LayoutRef::Named(n.clone()),
            LayoutRef::Inline(v) => LayoutRef::Inline(v.clone()),
        },
        memory_organization: match &dto.memory_organization {
            MemOrgRef::Named(n) => MemOrgRef::Named(n.clone()),
            MemOrgRef::Inline(d) => MemOrgRef::Inline(d.clone()),
        },
        ecc_requirement: dto.ecc_requirement.clone(),
        otp: dto.otp.clone(),
        alias: dto.alias.clone(),
        model: dto.model.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
        "vendors": {
            "acme": {
                "mfr-id": 165,
                "name": "Acme",
                "parts": [
                    {
                        "model": "ACME1G",
                        "id": [165, 18],
                        "id-type": "with-dummy-byte",
                        "qe-type": "cr-bit0",
                        "read-opcodes": { "1-1-1": { "opcode": 3 }, "1-1-4": { "opcode": 107 } },
                        "pl-opcodes": { "1-1-1": { "opcode": 2 } },
                        "page-layout": [
                            { "type": "data", "count": 2048 },
                            { "type": "marker", "count": 2 },
                            { "type": "oob-free", "count": 30 },
                            { "type": "ecc-parity", "count": 32 }
                        ],
                        "memory-organization": {
                            "page-size": 2048,
                            "oob-size": 64,
                            "pages-per-block": 64,
                            "blocks-per-lun": 1024
                        },
                        "ecc-requirement": { "step-size": 512, "strength-per-step": 1 }
                    }
                ]
            }
        }
    }
    "#;

    #[test]
    fn parses_sample_catalog() {
        let vendors = parse(SAMPLE).unwrap();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].mfr_id, 0xA5);
        assert_eq!(vendors[0].name, "Acme");
        let part = vendors[0].find_part(&[0xA5, 0x12]).unwrap();
        assert_eq!(part.model, "ACME1G");
        assert!(part.supports_read(IoType::Io114));
        assert_eq!(part.memory_org.page_size, 2048);
    }

    #[test]
    fn rejects_duplicate_part_names() {
        let doubled = SAMPLE.replacen("\"vendors\"", "\"vendors\"", 1);
        // Build a catalog with the same part twice by nesting it in an
        // array literal manually.
        let json = doubled.replace(
            "\"parts\": [",
            "\"parts\": [ { \"model\": \"ACME1G\", \"id\": [165, 19], \"id-type\": \"direct\", \"read-opcodes\": {\"1-1-1\":{\"opcode\":3}}, \"pl-opcodes\": {\"1-1-1\":{\"opcode\":2}}, \"page-layout\": [{\"type\":\"data\",\"count\":2048},{\"type\":\"marker\",\"count\":2},{\"type\":\"oob-free\",\"count\":62}], \"memory-organization\": {\"page-size\":2048,\"oob-size\":64,\"pages-per-block\":64,\"blocks-per-lun\":1024} },",
        );
        let err = parse(&json).unwrap_err();
        assert!(matches!(err, Error::AlreadyExist(_)));
    }

    #[test]
    fn rejects_bad_mfr_id() {
        let json = SAMPLE.replace("\"mfr-id\": 165", "\"mfr-id\": 0");
        assert!(parse(&json).is_err());
    }
}
