//! XML rendition of mapping documents
//!
//! Layout matches the ground-truth corpus:
//!
//! ```xml
//! <TEST FILENAME="Foo">
//!   <VERSION NUMBER="2">
//!     <LOCATION ORIG="1" NEW="1"/>
//!     <LOCATION ORIG="2" NEW="3">
//!       <ALT NEW="4"/>
//!     </LOCATION>
//!   </VERSION>
//! </TEST>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::document::{FileDocument, LocationRecord, VersionRecord};
use crate::error::{ReportError, xml_err};

const TEST: &[u8] = b"TEST";
const VERSION: &[u8] = b"VERSION";
const LOCATION: &[u8] = b"LOCATION";
const ALT: &[u8] = b"ALT";

impl FileDocument {
    pub fn to_xml(&self) -> Result<String, ReportError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;

        let mut test = BytesStart::new("TEST");
        test.push_attribute(("FILENAME", self.name.as_str()));
        writer.write_event(Event::Start(test)).map_err(xml_err)?;

        for version in &self.versions {
            let mut start = BytesStart::new("VERSION");
            start.push_attribute(("NUMBER", version.number.to_string().as_str()));
            writer.write_event(Event::Start(start)).map_err(xml_err)?;

            for loc in &version.locations {
                let mut location = BytesStart::new("LOCATION");
                location.push_attribute(("ORIG", loc.orig.to_string().as_str()));
                location.push_attribute(("NEW", loc.new.to_string().as_str()));

                if loc.alternates.is_empty() {
                    writer.write_event(Event::Empty(location)).map_err(xml_err)?;
                    continue;
                }
                writer.write_event(Event::Start(location)).map_err(xml_err)?;
                for alt in &loc.alternates {
                    let mut alt_elem = BytesStart::new("ALT");
                    alt_elem.push_attribute(("NEW", alt.to_string().as_str()));
                    writer.write_event(Event::Empty(alt_elem)).map_err(xml_err)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("LOCATION")))
                    .map_err(xml_err)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("VERSION")))
                .map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("TEST")))
            .map_err(xml_err)?;

        String::from_utf8(writer.into_inner()).map_err(xml_err)
    }

    /// Parse a document. Unknown elements are ignored; a LOCATION whose
    /// attributes are not integers is an error.
    pub fn from_xml(text: &str) -> Result<Self, ReportError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut name = String::new();
        let mut versions: Vec<VersionRecord> = Vec::new();
        let mut open_location: Option<LocationRecord> = None;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == TEST => {
                    name = get_attr(&e, b"FILENAME")?.unwrap_or_default();
                }
                Event::Start(e) if e.name().as_ref() == VERSION => {
                    let number = require_version_number(&e)?;
                    versions.push(VersionRecord {
                        number,
                        from: number.saturating_sub(1).max(1),
                        to: number,
                        locations: Vec::new(),
                    });
                }
                Event::Start(e) if e.name().as_ref() == LOCATION => {
                    open_location = Some(parse_location(&e)?);
                }
                Event::Empty(e) if e.name().as_ref() == LOCATION => {
                    let loc = parse_location(&e)?;
                    current_version(&mut versions)?.locations.push(loc);
                }
                Event::Empty(e) if e.name().as_ref() == ALT => {
                    let alt = require_int(&e, b"NEW")?;
                    open_location
                        .as_mut()
                        .ok_or_else(|| {
                            ReportError::InvalidDocument("ALT outside LOCATION".to_string())
                        })?
                        .alternates
                        .push(alt);
                }
                Event::End(e) if e.name().as_ref() == LOCATION => {
                    if let Some(loc) = open_location.take() {
                        current_version(&mut versions)?.locations.push(loc);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(FileDocument { name, versions })
    }
}

fn current_version(versions: &mut [VersionRecord]) -> Result<&mut VersionRecord, ReportError> {
    versions
        .last_mut()
        .ok_or_else(|| ReportError::InvalidDocument("LOCATION outside VERSION".to_string()))
}

fn parse_location(e: &BytesStart<'_>) -> Result<LocationRecord, ReportError> {
    Ok(LocationRecord {
        orig: require_int(e, b"ORIG")?,
        new: require_int(e, b"NEW")?,
        alternates: Vec::new(),
    })
}

fn require_version_number(e: &BytesStart<'_>) -> Result<usize, ReportError> {
    let number = require_int(e, b"NUMBER")?;
    usize::try_from(number)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            ReportError::InvalidDocument(format!("NUMBER=\"{number}\" is not a version index"))
        })
}

fn get_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ReportError> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

fn require_int(e: &BytesStart<'_>, key: &[u8]) -> Result<i64, ReportError> {
    let attr_name = String::from_utf8_lossy(key);
    let value = get_attr(e, key)?.ok_or_else(|| {
        ReportError::InvalidDocument(format!(
            "{} missing {attr_name}",
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })?;
    value.trim().parse().map_err(|_| {
        ReportError::InvalidDocument(format!("{attr_name}=\"{value}\" is not an integer"))
    })
}
