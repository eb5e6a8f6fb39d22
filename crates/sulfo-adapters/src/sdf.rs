//! Escritor SDF (V2000) de la serie final de productos.
//!
//! Cada registro lleva la estructura con coordenadas en cero (no se
//! generan conformaciones), el nombre `<ProductID> | <S_ID> x
//! <Amine_ID>` y los mismos campos de trazabilidad y descriptores de la
//! tabla final. Los productos sin estructura utilizable no producen
//! registro.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sulfo_chem::{element, parse_smiles, BondOrder, Molecule};
use sulfo_domain::AnnotatedProduct;

use crate::csv_io::descriptor_cells;
use crate::error::PipelineError;

const DESCRIPTOR_FIELDS: [&str; 8] = [
    "MolWt", "LogP", "TPSA", "HBD", "HBA", "RotBonds", "RingCount", "FracCSP3",
];

// El bloque de conectividad V2000 direcciona átomos con tres dígitos.
const V2000_MAX_ATOMS: usize = 999;

/// Escribe los productos con estructura como registros V2000.
///
/// `wells[i]` es la etiqueta de pocillo del producto `i`, cuando el
/// producto alcanzó placa. Devuelve cuántos registros quedaron en el
/// archivo.
pub fn write_sdf(
    path: &Path,
    annotated: &[AnnotatedProduct],
    wells: &[String],
) -> Result<usize, PipelineError> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0usize;

    for (i, item) in annotated.iter().enumerate() {
        let p = &item.product;
        let smiles = match p.smiles.as_deref() {
            Some(s) => s,
            None => continue,
        };
        let mol = match parse_smiles(smiles) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(product = %p.product_id, error = %e,
                               "stored structure does not parse; record skipped");
                continue;
            }
        };
        if mol.atom_count() > V2000_MAX_ATOMS || mol.bonds().len() > V2000_MAX_ATOMS {
            tracing::warn!(product = %p.product_id, "structure exceeds the V2000 limits; record skipped");
            continue;
        }

        write_record(&mut out, item, &mol, wells.get(i).map(String::as_str))?;
        written += 1;
    }

    out.flush()?;
    Ok(written)
}

fn write_record(
    out: &mut impl Write,
    item: &AnnotatedProduct,
    mol: &Molecule,
    well: Option<&str>,
) -> Result<(), std::io::Error> {
    let p = &item.product;

    writeln!(out, "{} | {} x {}", p.product_id, p.sulfonyl_id, p.amine_id)?;
    writeln!(out, "  sulfolib")?;
    writeln!(out)?;
    writeln!(out, "{:3}{:3}  0  0  0  0  0  0  0  0999 V2000",
             mol.atom_count(), mol.bonds().len())?;

    for atom in mol.atoms() {
        let symbol = element::by_number(atom.atomic_number).map(|e| e.symbol).unwrap_or("*");
        writeln!(out, "    0.0000    0.0000    0.0000 {symbol:<3} 0  0  0  0  0  0  0  0  0  0  0  0")?;
    }
    for bond in mol.bonds() {
        let order = match bond.order {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        };
        writeln!(out, "{:3}{:3}{:3}  0", bond.a + 1, bond.b + 1, order)?;
    }

    // cargas formales en bloques M CHG de hasta ocho pares
    let charged: Vec<(usize, i8)> = mol.atoms()
                                       .iter()
                                       .enumerate()
                                       .filter(|(_, a)| a.formal_charge != 0)
                                       .map(|(i, a)| (i + 1, a.formal_charge))
                                       .collect();
    for chunk in charged.chunks(8) {
        write!(out, "M  CHG{:3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(out, "{idx:4}{charge:4}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "M  END")?;

    write_field(out, "ProductID", &p.product_id)?;
    write_field(out, "S_ID", &p.sulfonyl_id)?;
    write_field(out, "Amine_ID", &p.amine_id)?;
    write_field(out, "Status", p.status.as_str())?;
    if let Some(well) = well {
        write_field(out, "Well", well)?;
    }
    if item.descriptors.is_some() {
        let cells = descriptor_cells(item);
        for (name, value) in DESCRIPTOR_FIELDS.iter().zip(cells.iter()) {
            write_field(out, name, value)?;
        }
    }
    writeln!(out, "$$$$")?;
    Ok(())
}

fn write_field(out: &mut impl Write, name: &str, value: &str) -> Result<(), std::io::Error> {
    writeln!(out, ">  <{name}>")?;
    writeln!(out, "{value}")?;
    writeln!(out)
}
