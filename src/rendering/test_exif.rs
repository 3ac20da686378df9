//! Builds minimal little-endian TIFF/EXIF blobs for tests.

pub enum Value {
    Ascii(&'static str),
    Short(u16),
    Long(u32),
    Rationals(Vec<(u32, u32)>),
}

impl Value {
    fn type_and_count(&self) -> (u16, u32) {
        match self {
            Value::Ascii(s) => (2, s.len() as u32 + 1),
            Value::Short(_) => (3, 1),
            Value::Long(_) => (4, 1),
            Value::Rationals(v) => (5, v.len() as u32),
        }
    }

    fn out_of_line_len(&self) -> usize {
        match self {
            Value::Ascii(s) if s.len() + 1 > 4 => s.len() + 1,
            Value::Rationals(v) => v.len() * 8,
            _ => 0,
        }
    }

    fn bytes(&self) -> Vec<u8> {
        match self {
            Value::Ascii(s) => {
                let mut b = s.as_bytes().to_vec();
                b.push(0);
                b
            }
            Value::Short(v) => v.to_le_bytes().to_vec(),
            Value::Long(v) => v.to_le_bytes().to_vec(),
            Value::Rationals(v) => v
                .iter()
                .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
                .collect(),
        }
    }
}

pub type Ifd = Vec<(u16, Value)>;

fn ifd_len(entries: &Ifd) -> usize {
    2 + 12 * entries.len() + 4 + entries.iter().map(|(_, v)| v.out_of_line_len()).sum::<usize>()
}

fn write_ifd(out: &mut Vec<u8>, entries: &Ifd) {
    let start = out.len();
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    let mut data = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, value) in entries {
        let (kind, count) = value.type_and_count();
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        let bytes = value.bytes();
        if value.out_of_line_len() > 0 {
            out.extend_from_slice(&(data_offset as u32).to_le_bytes());
            data_offset += bytes.len();
            data.extend_from_slice(&bytes);
        } else {
            let mut inline = bytes;
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data);
}

/// TIFF blob with IFD0 plus optional EXIF and GPS sub-IFDs.
pub fn tiff(mut ifd0: Ifd, exif: Option<Ifd>, gps: Option<Ifd>) -> Vec<u8> {
    let pointer_count = exif.is_some() as usize + gps.is_some() as usize;
    let ifd0_len = ifd_len(&ifd0) + 12 * pointer_count;
    let mut next = 8 + ifd0_len;
    if let Some(exif) = &exif {
        ifd0.push((0x8769, Value::Long(next as u32)));
        next += ifd_len(exif);
    }
    if let Some(gps) = &gps {
        ifd0.push((0x8825, Value::Long(next as u32)));
    }

    let mut out = vec![b'I', b'I', 0x2A, 0x00, 8, 0, 0, 0];
    write_ifd(&mut out, &ifd0);
    if let Some(exif) = &exif {
        write_ifd(&mut out, exif);
    }
    if let Some(gps) = &gps {
        write_ifd(&mut out, gps);
    }
    out
}

/// Insert an APP1 EXIF segment right after the JPEG SOI marker.
pub fn jpeg_with_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}
