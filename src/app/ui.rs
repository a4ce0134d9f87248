use super::events::UiEvent;
use super::ActionProgress;
use super::BoardUploader;
use crate::board::PostKind;
use crate::upload::UploadStatus;
use crate::utils::color::{notification_fill, ACCENT};
use crate::utils::file_size::FileSizeUtils;
use crate::utils::text::truncate;
use eframe::egui::{self, Align, Align2, Color32, RichText};
use std::time::Instant;

const TITLE_PREVIEW_CHARS: usize = 60;

impl BoardUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("File Board");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Share files and short messages")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_file_form(ui);

                    ui.add_space(20.0);
                    self.render_message_form(ui);

                    ui.add_space(20.0);
                    self.render_board(ui);

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });

        self.render_notification(ctx);
        if self.orchestrator.is_in_progress() {
            self.render_loading_overlay(ctx);
        }
        if self.confirm_close {
            self.render_close_prompt(ctx);
        }
    }

    fn render_file_form(&mut self, ui: &mut egui::Ui) {
        let busy = self.orchestrator.is_in_progress();

        ui.group(|ui| {
            ui.label(RichText::new("📁 Upload files").strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Title");
                ui.add_enabled(
                    !busy,
                    egui::TextEdit::singleline(&mut self.file_form.title)
                        .hint_text("Defaults to each file's name")
                        .desired_width(ui.available_width()),
                );
            });
            ui.add_space(8.0);

            let fill = if self.drop_zone.is_active() {
                ui.visuals().selection.bg_fill.gamma_multiply(0.4)
            } else {
                ui.visuals().extreme_bg_color
            };
            let zone = egui::Frame::group(ui.style())
                .fill(fill)
                .show(ui, |ui| {
                    ui.set_min_size(egui::vec2(ui.available_width(), 80.0));
                    ui.vertical_centered(|ui| {
                        ui.add_space(12.0);
                        ui.label("Drop files here or click to browse");
                        ui.label(
                            RichText::new(format!(
                                "Up to {} per file",
                                self.orchestrator.size_limit().text
                            ))
                            .small()
                            .weak(),
                        );
                    });
                })
                .response
                .interact(egui::Sense::click());
            self.drop_zone_rect = Some(zone.rect);
            if zone.clicked() {
                self.events.emit(UiEvent::OpenPicker);
            }

            self.render_file_list(ui);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_enabled_ui(self.orchestrator.can_submit_files(), |ui| {
                    let button =
                        egui::Button::new("📤 Upload Files").min_size(egui::vec2(160.0, 32.0));
                    if ui.add(button).clicked() {
                        self.events.emit(UiEvent::SubmitFiles);
                    }
                });
                ui.add_enabled_ui(!busy && !self.orchestrator.selection().is_empty(), |ui| {
                    if ui.button("🗑 Clear").clicked() {
                        self.events.emit(UiEvent::ClearFiles);
                    }
                });
            });

            if !matches!(self.state.progress, ActionProgress::NotStarted) {
                ui.add_space(8.0);
                self.render_progress(ui);
            }
        });
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        let selection = self.orchestrator.selection();
        if selection.is_empty() {
            return;
        }

        let busy = self.orchestrator.is_in_progress();
        let mut removed = None;

        ui.add_space(8.0);
        ui.label(format!(
            "{} file(s), {}",
            selection.len(),
            FileSizeUtils::format_size(selection.total_size())
        ));
        egui::ScrollArea::vertical()
            .id_source("file_list")
            .max_height(160.0)
            .show(ui, |ui| {
                for (index, file) in selection.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(&file.name);
                        ui.label(RichText::new(FileSizeUtils::format_size(file.size)).weak());
                        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                            if ui.add_enabled(!busy, egui::Button::new("Remove")).clicked() {
                                removed = Some(index);
                            }
                        });
                    });
                }
            });

        if let Some(index) = removed {
            self.events.emit(UiEvent::RemoveFile(index));
        }
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if let Some(current_file) = &self.state.current_file {
            let status_text = match &self.state.progress {
                ActionProgress::Completed { failed, .. } => {
                    if *failed > 0 {
                        "Finished with errors"
                    } else {
                        "Upload complete"
                    }
                }
                _ => "📤 Uploading",
            };
            ui.label(format!("{}: {}", status_text, current_file));
        }

        let progress_bar = egui::ProgressBar::new(self.state.get_progress_percentage())
            .show_percentage()
            .animate(false)
            .fill(ACCENT);
        ui.add(progress_bar);
        ui.label(self.state.get_status_text());

        if !self.state.file_statuses.is_empty() {
            ui.add_space(6.0);
            self.render_details(ui);
        }
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.state.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.state.show_details = !self.state.show_details;
        }

        if self.state.show_details {
            egui::ScrollArea::vertical()
                .id_source("upload_details")
                .max_height(200.0)
                .show(ui, |ui| {
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .show(ui, |ui| {
                            ui.add_space(8.0);
                            for status in &self.state.file_statuses {
                                ui.horizontal(|ui| match &status.status {
                                    UploadStatus::Processing => {
                                        ui.label("⏳");
                                        ui.colored_label(
                                            Color32::from_rgb(150, 150, 150),
                                            format!("{} - Processing...", status.name),
                                        );
                                    }
                                    UploadStatus::Success(_) => {
                                        ui.label("✅");
                                        ui.colored_label(Color32::from_rgb(0, 180, 0), &status.name);
                                    }
                                    UploadStatus::Error(err) => {
                                        ui.label("❌");
                                        ui.colored_label(
                                            Color32::from_rgb(220, 50, 50),
                                            format!("{} - {}", status.name, err),
                                        );
                                    }
                                });
                                ui.add_space(4.0);
                            }
                            ui.add_space(8.0);
                        });
                });
        }
    }

    fn render_message_form(&mut self, ui: &mut egui::Ui) {
        let busy = self.orchestrator.is_in_progress();
        let content_hint = if self.orchestrator.content_required() {
            "Content"
        } else {
            "Content (optional)"
        };

        ui.group(|ui| {
            ui.label(RichText::new("💬 Post a message").strong());
            ui.add_space(8.0);
            ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.message_form.title)
                    .hint_text("Title")
                    .desired_width(ui.available_width()),
            );
            ui.add_space(4.0);
            ui.add_enabled(
                !busy,
                egui::TextEdit::multiline(&mut self.message_form.content)
                    .hint_text(content_hint)
                    .desired_rows(4)
                    .desired_width(ui.available_width()),
            );
            ui.add_space(8.0);
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("Post Message").clicked() {
                    self.events.emit(UiEvent::SubmitMessage);
                }
            });
        });
    }

    fn render_board(&mut self, ui: &mut egui::Ui) {
        let mut toggled = None;

        ui.group(|ui| {
            ui.label(RichText::new("📋 Posted this session").strong());
            ui.add_space(6.0);

            if self.board.posts().is_empty() {
                ui.label(RichText::new("Nothing posted yet").weak());
                return;
            }

            for post in self.board.posts() {
                ui.horizontal(|ui| {
                    if ui.small_button(post.glyph()).clicked() {
                        toggled = Some(post.id);
                    }
                    ui.label(match post.kind {
                        PostKind::File => "📄",
                        PostKind::Message => "💬",
                    });
                    ui.label(truncate(&post.title, TITLE_PREVIEW_CHARS));
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(&post.relative_time).weak())
                            .on_hover_text(&post.absolute_time);
                    });
                });
                if post.expanded {
                    egui::Frame::none()
                        .fill(ui.visuals().extreme_bg_color)
                        .inner_margin(egui::Margin::symmetric(8.0, 6.0))
                        .show(ui, |ui| {
                            if post.body.is_empty() {
                                ui.label(RichText::new("(no content)").weak());
                            } else {
                                ui.label(&post.body);
                            }
                        });
                }
                ui.add_space(4.0);
            }
        });

        if let Some(id) = toggled {
            self.events.emit(UiEvent::TogglePost(id));
        }
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Board:");
            if ui
                .add(
                    egui::Label::new(RichText::new(&self.config.server_url).color(ACCENT))
                        .sense(egui::Sense::click()),
                )
                .on_hover_text("Open in browser")
                .clicked()
            {
                self.events.emit(UiEvent::OpenBoardInBrowser);
            }
        });
    }

    fn render_notification(&mut self, ctx: &egui::Context) {
        let Some(notification) = self.notifier.visible(Instant::now()).cloned() else {
            return;
        };

        egui::Area::new("notification")
            .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let clicked = egui::Frame::none()
                    .fill(notification_fill(notification.kind))
                    .rounding(6.0)
                    .inner_margin(egui::Margin::symmetric(14.0, 8.0))
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(
                                RichText::new(&notification.text).color(Color32::WHITE),
                            )
                            .sense(egui::Sense::click()),
                        )
                        .clicked()
                    })
                    .inner;
                if clicked {
                    self.events.emit(UiEvent::DismissNotification);
                }
            });
    }

    fn render_loading_overlay(&mut self, ctx: &egui::Context) {
        egui::Area::new("loading_overlay")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        let text = self.state.get_status_text();
                        ui.label(if text.is_empty() {
                            "Uploading...".to_string()
                        } else {
                            text
                        });
                    });
                });
            });
    }

    fn render_close_prompt(&mut self, ctx: &egui::Context) {
        egui::Window::new("Upload in progress")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Files are still being uploaded. Quit anyway?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Quit anyway").clicked() {
                        self.events.emit(UiEvent::ConfirmClose);
                    }
                    if ui.button("Keep uploading").clicked() {
                        self.events.emit(UiEvent::CancelClose);
                    }
                });
            });
    }
}
