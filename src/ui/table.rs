use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::upload::{TablePreview, UploadPreview};

// ---------------------------------------------------------------------------
// Upload preview (below the drop zone)
// ---------------------------------------------------------------------------

pub fn upload_preview(ui: &mut Ui, preview: &UploadPreview) {
    match preview {
        UploadPreview::Error { filename, message } => {
            filename_heading(ui, filename);
            ui.label(message);
        }
        UploadPreview::Table(table) => table_preview(ui, table),
    }
}

fn filename_heading(ui: &mut Ui, filename: &str) {
    ui.label(RichText::new(filename).strong().size(15.0));
}

fn table_preview(ui: &mut Ui, table: &TablePreview) {
    filename_heading(ui, &table.filename);

    if table.columns.is_empty() {
        ui.label("(no columns)");
    } else {
        ScrollArea::horizontal()
            .id_salt("upload_table")
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(
                        Column::auto().at_least(60.0).resizable(true),
                        table.columns.len(),
                    )
                    .header(20.0, |mut header| {
                        for name in &table.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, table.rows.len(), |mut row| {
                            let cells = &table.rows[row.index()];
                            // Short rows leave trailing cells blank.
                            for i in 0..table.columns.len() {
                                row.col(|ui: &mut Ui| {
                                    if let Some(cell) = cells.get(i) {
                                        ui.label(cell.to_string());
                                    }
                                });
                            }
                        });
                    });
            });
    }

    ui.separator();

    ui.add(egui::Label::new(RichText::new(&table.excerpt).monospace()).wrap());
}
