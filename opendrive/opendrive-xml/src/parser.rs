//! Event-based OpenDRIVE reader.
//!
//! Reads a whole document into the normalised [`OpendriveModel`]. The reader
//! is deliberately permissive: required-but-broken numerics parse to NaN and
//! blank optionals to NaN-valued `Some`, so the evaluator can classify and
//! report every defect instead of the reader dropping data silently.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use opendrive_types::{
    CenterLane, Connection, ContactPoint, ElevationProfile, GeoReference, GeometryKind, Header,
    Junction, JunctionLaneLink, Lane, LaneHeightEntry, LaneLink, LaneMaterial, LaneSection,
    LaneType, Lanes, LateralProfile, Link, LinkedElement, ObjectRepeat, ObjectType,
    OpendriveModel, Orientation, OutlineCorner, PlanViewGeometry, Poly3Entry, Road, RoadLink,
    RoadMark, RoadMarkColor, RoadMarkKind, RoadObject, RoadSignal, SchemaVersion, ShapeEntry,
    TrafficRule, LANE_LINK_SENTINEL,
};

use crate::error::{OdrXmlError, Result};
use crate::version::{adapter_for, detect_version, VersionAdapter};

/// Read an OpenDRIVE document, detecting the schema version from the header.
///
/// # Errors
///
/// Fails for malformed XML, a missing header, or an unsupported version.
pub fn read_opendrive_str(xml: &str) -> Result<(OpendriveModel, SchemaVersion)> {
    let version = detect_version(xml)?;
    let adapter = adapter_for(version)?;
    let model = read_opendrive_with(&adapter, xml)?;
    Ok((model, version))
}

/// Read an OpenDRIVE document with an explicit version adapter.
///
/// # Errors
///
/// Fails for malformed XML or a root element other than `<OpenDRIVE>`.
pub fn read_opendrive_with(adapter: &VersionAdapter, xml: &str) -> Result<OpendriveModel> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut model: Option<OpendriveModel> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"OpenDRIVE" {
                    model = Some(parse_document(&mut reader, adapter)?);
                } else {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(OdrXmlError::WrongRootElement(name));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    let model = model.ok_or_else(|| OdrXmlError::missing_element("OpenDRIVE", "document"))?;
    tracing::debug!(
        roads = model.roads.len(),
        junctions = model.junctions.len(),
        version = %adapter.version,
        "read OpenDRIVE document"
    );
    Ok(model)
}

/// Fetch an attribute as an owned string.
pub(crate) fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .filter_map(std::result::Result::ok)
        .find(|a| a.key.as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(std::borrow::Cow::into_owned))
}

/// Optional float attribute: absent stays `None`, present-but-broken becomes
/// `Some(NaN)` for the evaluator to report.
fn float_attr(e: &BytesStart, name: &str) -> Option<f64> {
    attribute(e, name).map(|v| v.trim().parse::<f64>().unwrap_or(f64::NAN))
}

/// Required float attribute: absent or broken becomes NaN for the fatal
/// evaluator to catch.
fn required_float(e: &BytesStart, name: &str) -> f64 {
    float_attr(e, name).unwrap_or(f64::NAN)
}

fn string_attr(e: &BytesStart, name: &str) -> String {
    attribute(e, name).unwrap_or_default()
}

/// Skip an element and all of its children.
fn skip_element<R: std::io::BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut depth = 1usize;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => depth += 1,
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse(format!(
                    "unexpected EOF while skipping <{}>",
                    String::from_utf8_lossy(name)
                )))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
}

fn parse_document<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    adapter: &VersionAdapter,
) -> Result<OpendriveModel> {
    let mut model = OpendriveModel::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"header" => model.header = Some(parse_header(reader, e)?),
                b"road" => model.roads.push(parse_road(reader, e, adapter)?),
                b"junction" => model.junctions.push(parse_junction(reader, e)?),
                other => skip_element(reader, &other.to_vec())?,
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"header" {
                    model.header = Some(header_from_attrs(e));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"OpenDRIVE" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in OpenDRIVE".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(model)
}

fn header_from_attrs(e: &BytesStart) -> Header {
    Header {
        version: SchemaVersion::new(
            attribute(e, "revMajor")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            attribute(e, "revMinor")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        ),
        name: string_attr(e, "name"),
        data_version: string_attr(e, "version"),
        date: string_attr(e, "date"),
        north: float_attr(e, "north"),
        south: float_attr(e, "south"),
        east: float_attr(e, "east"),
        west: float_attr(e, "west"),
        vendor: string_attr(e, "vendor"),
        geo_reference: None,
    }
}

fn parse_header<R: std::io::BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Header> {
    let mut header = header_from_attrs(start);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"geoReference" => {
                let mut proj = String::new();
                let mut inner = Vec::new();
                loop {
                    match reader.read_event_into(&mut inner) {
                        Ok(Event::Text(t)) => {
                            if let Ok(text) = std::str::from_utf8(&t) {
                                proj.push_str(text.trim());
                            }
                        }
                        Ok(Event::CData(t)) => {
                            if let Ok(text) = std::str::from_utf8(&t) {
                                proj.push_str(text.trim());
                            }
                        }
                        Ok(Event::End(ref e)) if e.name().as_ref() == b"geoReference" => break,
                        Ok(Event::Eof) => {
                            return Err(OdrXmlError::XmlParse(
                                "unexpected EOF in geoReference".into(),
                            ))
                        }
                        Ok(_) => {}
                        Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
                    }
                    inner.clear();
                }
                header.geo_reference = Some(GeoReference {
                    epsg: scrape_epsg(&proj),
                    proj_string: proj,
                });
            }
            Ok(Event::Start(ref e)) => skip_element(reader, &e.name().as_ref().to_vec())?,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"header" => break,
            Ok(Event::Eof) => return Err(OdrXmlError::XmlParse("unexpected EOF in header".into())),
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(header)
}

/// Pull an EPSG code out of a PROJ string (`+init=epsg:25832` or `EPSG:25832`).
fn scrape_epsg(proj: &str) -> Option<u32> {
    let lower = proj.to_ascii_lowercase();
    let idx = lower.find("epsg:")?;
    let digits: String = lower[idx + 5..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn parse_road<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
    adapter: &VersionAdapter,
) -> Result<Road> {
    let junction = match string_attr(start, "junction").as_str() {
        "" | "-1" => None,
        id => Some(id.to_string()),
    };
    let rule = if adapter.road_rule_attribute && string_attr(start, "rule") == "LHT" {
        TrafficRule::Lht
    } else {
        TrafficRule::Rht
    };

    let mut road = Road {
        id: string_attr(start, "id"),
        name: string_attr(start, "name"),
        length: required_float(start, "length"),
        junction,
        rule,
        plan_view: Vec::new(),
        elevation_profile: None,
        lateral_profile: LateralProfile::default(),
        lanes: Lanes::default(),
        objects: Vec::new(),
        signals: Vec::new(),
        link: Link::default(),
    };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"link" => road.link = parse_road_link(reader)?,
                b"planView" => road.plan_view = parse_plan_view(reader, adapter)?,
                b"elevationProfile" => {
                    road.elevation_profile = Some(ElevationProfile {
                        entries: parse_poly3_list(reader, b"elevationProfile", b"elevation")?,
                    });
                }
                b"lateralProfile" => road.lateral_profile = parse_lateral_profile(reader)?,
                b"lanes" => road.lanes = parse_lanes(reader)?,
                b"objects" => road.objects = parse_objects(reader)?,
                b"signals" => road.signals = parse_signals(reader)?,
                other => skip_element(reader, &other.to_vec())?,
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"road" => break,
            Ok(Event::Eof) => return Err(OdrXmlError::XmlParse("unexpected EOF in road".into())),
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(road)
}

fn road_link_from_attrs(e: &BytesStart) -> RoadLink {
    RoadLink {
        element: if string_attr(e, "elementType") == "junction" {
            LinkedElement::Junction
        } else {
            LinkedElement::Road
        },
        id: string_attr(e, "elementId"),
        contact_point: match string_attr(e, "contactPoint").as_str() {
            "start" => Some(ContactPoint::Start),
            "end" => Some(ContactPoint::End),
            _ => None,
        },
    }
}

fn parse_road_link<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<Link> {
    let mut link = Link::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"predecessor" => link.predecessor = Some(road_link_from_attrs(e)),
                b"successor" => link.successor = Some(road_link_from_attrs(e)),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"link" => break,
            Ok(Event::Eof) => return Err(OdrXmlError::XmlParse("unexpected EOF in link".into())),
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(link)
}

fn parse_plan_view<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    adapter: &VersionAdapter,
) -> Result<Vec<PlanViewGeometry>> {
    let mut segments = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"geometry" => {
                segments.push(parse_geometry(reader, e, adapter)?);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"planView" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in planView".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(segments)
}

fn parse_geometry<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
    adapter: &VersionAdapter,
) -> Result<PlanViewGeometry> {
    let mut kind = GeometryKind::Line;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"line" => kind = GeometryKind::Line,
                b"arc" => {
                    kind = GeometryKind::Arc {
                        curvature: required_float(e, "curvature"),
                    };
                }
                b"spiral" => {
                    kind = GeometryKind::Spiral {
                        curv_start: required_float(e, "curvStart"),
                        curv_end: required_float(e, "curvEnd"),
                    };
                }
                b"poly3" => {
                    kind = GeometryKind::Poly3 {
                        a: required_float(e, "a"),
                        b: required_float(e, "b"),
                        c: required_float(e, "c"),
                        d: required_float(e, "d"),
                    };
                }
                b"paramPoly3" => {
                    let normalized = match attribute(e, "pRange").as_deref() {
                        Some("normalized") => true,
                        Some("arcLength") => false,
                        _ => adapter.param_poly_default_normalized,
                    };
                    kind = GeometryKind::ParamPoly3 {
                        u: [
                            required_float(e, "aU"),
                            required_float(e, "bU"),
                            required_float(e, "cU"),
                            required_float(e, "dU"),
                        ],
                        v: [
                            required_float(e, "aV"),
                            required_float(e, "bV"),
                            required_float(e, "cV"),
                            required_float(e, "dV"),
                        ],
                        normalized,
                    };
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"geometry" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in geometry".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(PlanViewGeometry {
        s: required_float(start, "s"),
        x: required_float(start, "x"),
        y: required_float(start, "y"),
        hdg: required_float(start, "hdg"),
        length: required_float(start, "length"),
        kind,
    })
}

fn poly3_from_attrs(e: &BytesStart, s_name: &str) -> Poly3Entry {
    Poly3Entry {
        s: required_float(e, s_name),
        a: required_float(e, "a"),
        b: required_float(e, "b"),
        c: required_float(e, "c"),
        d: required_float(e, "d"),
    }
}

/// Parse a flat list of poly3 records (`elevation`, `superelevation`, ...).
fn parse_poly3_list<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    parent: &[u8],
    entry: &[u8],
) -> Result<Vec<Poly3Entry>> {
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == entry {
                    entries.push(poly3_from_attrs(e, "s"));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == parent => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse(format!(
                    "unexpected EOF in {}",
                    String::from_utf8_lossy(parent)
                )))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(entries)
}

fn parse_lateral_profile<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<LateralProfile> {
    let mut profile = LateralProfile::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"superelevation" => profile.superelevation.push(poly3_from_attrs(e, "s")),
                b"shape" => profile.shape.push(ShapeEntry {
                    s: required_float(e, "s"),
                    t: required_float(e, "t"),
                    a: required_float(e, "a"),
                    b: required_float(e, "b"),
                    c: required_float(e, "c"),
                    d: required_float(e, "d"),
                }),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"lateralProfile" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse(
                    "unexpected EOF in lateralProfile".into(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(profile)
}

fn parse_lanes<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<Lanes> {
    let mut lanes = Lanes::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"laneSection" => lanes.sections.push(parse_lane_section(reader, e)?),
                b"laneOffset" => {
                    lanes.lane_offset.push(poly3_from_attrs(e, "s"));
                    skip_element(reader, b"laneOffset")?;
                }
                other => skip_element(reader, &other.to_vec())?,
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"laneOffset" {
                    lanes.lane_offset.push(poly3_from_attrs(e, "s"));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"lanes" => break,
            Ok(Event::Eof) => return Err(OdrXmlError::XmlParse("unexpected EOF in lanes".into())),
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(lanes)
}

fn parse_lane_section<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
) -> Result<LaneSection> {
    let mut section = LaneSection {
        s: required_float(start, "s"),
        ..LaneSection::default()
    };
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"left" => section.left = parse_lane_group(reader, b"left")?.0,
                b"center" => {
                    let (_, center) = parse_lane_group(reader, b"center")?;
                    section.center = center;
                }
                b"right" => section.right = parse_lane_group(reader, b"right")?.0,
                other => skip_element(reader, &other.to_vec())?,
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"laneSection" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse(
                    "unexpected EOF in laneSection".into(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(section)
}

/// Parse a `<left>`, `<center>`, or `<right>` group.
///
/// The centre lane (id 0) carries only its road marks; side lanes carry the
/// full lane record.
fn parse_lane_group<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    group: &[u8],
) -> Result<(Vec<Lane>, CenterLane)> {
    let mut side = Vec::new();
    let mut center = CenterLane::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"lane" => {
                let lane = parse_lane(reader, e)?;
                if lane.id == 0 {
                    center = CenterLane {
                        road_marks: lane.road_marks,
                    };
                } else {
                    side.push(lane);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == group => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse(format!(
                    "unexpected EOF in {}",
                    String::from_utf8_lossy(group)
                )))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok((side, center))
}

fn parse_lane<R: std::io::BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Lane> {
    let mut lane = Lane {
        id: attribute(start, "id")
            .and_then(|v| v.parse().ok())
            .unwrap_or(LANE_LINK_SENTINEL),
        kind: LaneType::from_str(&string_attr(start, "type")),
        level: string_attr(start, "level") == "true",
        widths: Vec::new(),
        heights: Vec::new(),
        road_marks: Vec::new(),
        material: None,
        speed: None,
        link: LaneLink::default(),
    };
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) => lane_child_from_attrs(&mut lane, e),
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                if name == b"link" {
                    lane.link = parse_lane_link(reader)?;
                } else {
                    lane_child_from_attrs(&mut lane, e);
                    skip_element(reader, &name)?;
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"lane" => break,
            Ok(Event::Eof) => return Err(OdrXmlError::XmlParse("unexpected EOF in lane".into())),
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(lane)
}

/// Absorb a lane child element that carries everything in its attributes.
fn lane_child_from_attrs(lane: &mut Lane, e: &BytesStart) {
    match e.name().as_ref() {
        b"width" => lane.widths.push(poly3_from_attrs(e, "sOffset")),
        b"roadMark" => lane.road_marks.push(RoadMark {
            s_offset: required_float(e, "sOffset"),
            kind: RoadMarkKind::from_str(&string_attr(e, "type")),
            color: RoadMarkColor::from_str(&string_attr(e, "color")),
            width: float_attr(e, "width"),
        }),
        b"material" => {
            lane.material = Some(LaneMaterial {
                surface: string_attr(e, "surface"),
                friction: float_attr(e, "friction"),
                roughness: float_attr(e, "roughness"),
            });
        }
        b"speed" => lane.speed = float_attr(e, "max"),
        b"height" => lane.heights.push(LaneHeightEntry {
            s_offset: required_float(e, "sOffset"),
            inner: required_float(e, "inner"),
            outer: required_float(e, "outer"),
        }),
        _ => {}
    }
}

fn parse_lane_link<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<LaneLink> {
    let mut link = LaneLink::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"predecessor" => {
                    link.predecessor = attribute(e, "id").and_then(|v| v.parse().ok());
                }
                b"successor" => {
                    link.successor = attribute(e, "id").and_then(|v| v.parse().ok());
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"link" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in lane link".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(link)
}

fn parse_objects<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<Vec<RoadObject>> {
    let mut objects = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"object" => {
                objects.push(parse_object(reader, e)?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"object" => {
                objects.push(object_from_attrs(e));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"objects" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in objects".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(objects)
}

fn object_from_attrs(e: &BytesStart) -> RoadObject {
    RoadObject {
        id: string_attr(e, "id"),
        name: string_attr(e, "name"),
        kind: ObjectType::from_str(&string_attr(e, "type")),
        s: required_float(e, "s"),
        t: required_float(e, "t"),
        z_offset: float_attr(e, "zOffset").unwrap_or(0.0),
        orientation: Orientation::from_str(&string_attr(e, "orientation")),
        hdg: float_attr(e, "hdg").unwrap_or(0.0),
        pitch: float_attr(e, "pitch").unwrap_or(0.0),
        roll: float_attr(e, "roll").unwrap_or(0.0),
        length: float_attr(e, "length"),
        width: float_attr(e, "width"),
        height: float_attr(e, "height"),
        radius: float_attr(e, "radius"),
        repeat: None,
        outline: Vec::new(),
    }
}

fn parse_object<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
) -> Result<RoadObject> {
    let mut object = object_from_attrs(start);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"repeat" => {
                    object.repeat = Some(ObjectRepeat {
                        length: required_float(e, "length"),
                        distance: float_attr(e, "distance").unwrap_or(0.0),
                    });
                }
                b"cornerLocal" => object.outline.push(OutlineCorner {
                    u: required_float(e, "u"),
                    v: required_float(e, "v"),
                    height: float_attr(e, "height").unwrap_or(0.0),
                }),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"object" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in object".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(object)
}

fn parse_signals<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<Vec<RoadSignal>> {
    let mut signals = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"signal" {
                    signals.push(RoadSignal {
                        id: string_attr(e, "id"),
                        name: string_attr(e, "name"),
                        s: required_float(e, "s"),
                        t: required_float(e, "t"),
                        z_offset: float_attr(e, "zOffset").unwrap_or(0.0),
                        type_code: string_attr(e, "type"),
                        subtype: string_attr(e, "subtype"),
                        dynamic: string_attr(e, "dynamic") == "yes",
                        orientation: Orientation::from_str(&string_attr(e, "orientation")),
                    });
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"signals" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in signals".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(signals)
}

fn parse_junction<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
) -> Result<Junction> {
    let mut junction = Junction {
        id: string_attr(start, "id"),
        name: string_attr(start, "name"),
        connections: Vec::new(),
    };
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"connection" => {
                junction.connections.push(parse_connection(reader, e)?);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"junction" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in junction".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(junction)
}

fn parse_connection<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
) -> Result<Connection> {
    let mut connection = Connection {
        id: string_attr(start, "id"),
        incoming_road: string_attr(start, "incomingRoad"),
        connecting_road: string_attr(start, "connectingRoad"),
        contact_point: if string_attr(start, "contactPoint") == "end" {
            ContactPoint::End
        } else {
            ContactPoint::Start
        },
        lane_links: Vec::new(),
    };
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"laneLink" {
                    connection.lane_links.push(JunctionLaneLink {
                        from: attribute(e, "from")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(LANE_LINK_SENTINEL),
                        to: attribute(e, "to")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(LANE_LINK_SENTINEL),
                    });
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"connection" => break,
            Ok(Event::Eof) => {
                return Err(OdrXmlError::XmlParse("unexpected EOF in connection".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(OdrXmlError::XmlParse(e.to_string())),
        }
        buf.clear();
    }
    Ok(connection)
}
