use dioxus::prelude::*;

use crate::templates::render_page;

#[allow(non_snake_case)]
#[component]
fn IndexPage(prediction: Option<String>) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "Reddit Flair Detector" }
            script { src: "https://cdn.tailwindcss.com" }
        }
        body { class: "flex items-center justify-center min-h-screen bg-gray-50 font-sans text-gray-900",
            div { class: "w-full max-w-lg bg-white border border-gray-200 rounded-lg p-8",
                h2 { class: "text-xl font-semibold mb-1", "Reddit Flair Detector" }
                p { class: "text-gray-500 text-sm mb-4",
                    "Paste the link to an r/india thread to predict its flair."
                }
                if let Some(prediction) = &prediction {
                    div { id: "prediction", class: "bg-blue-50 border border-blue-200 text-blue-900 text-sm px-3 py-2 rounded mb-4",
                        "{prediction}"
                    }
                }
                form { method: "POST", action: "/predict",
                    label { r#for: "url", class: "block text-sm text-gray-500 mb-1", "Thread URL" }
                    input {
                        r#type: "url", name: "url", id: "url", required: true,
                        placeholder: "https://www.reddit.com/r/india/comments/...",
                        class: "w-full px-3 py-2.5 border border-gray-300 rounded text-base mb-3",
                        autofocus: true
                    }
                    button {
                        r#type: "submit",
                        class: "w-full py-2.5 bg-blue-600 text-white rounded text-sm font-medium cursor-pointer hover:bg-blue-800",
                        "Predict Flair"
                    }
                }
                h3 { class: "text-sm font-semibold mt-6 mb-1", "Batch" }
                p { class: "text-gray-500 text-sm mb-2",
                    "Upload a text file with one thread URL per line. The response is JSON."
                }
                form { method: "POST", action: "/automated_testing", enctype: "multipart/form-data",
                    input {
                        r#type: "file", name: "upload_file", required: true,
                        class: "w-full text-sm mb-3"
                    }
                    button {
                        r#type: "submit",
                        class: "w-full py-2.5 border border-blue-600 text-blue-600 rounded text-sm font-medium cursor-pointer hover:bg-blue-50",
                        "Upload"
                    }
                }
            }
        }
    }
}

/// The form page, optionally showing the outcome of the last prediction.
pub fn render_index(prediction: Option<String>) -> String {
    render_page(IndexPage, IndexPageProps { prediction })
}
