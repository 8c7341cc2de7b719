//! Fixed prompt templates sent to the language model.

/// Prompt asking for a narrative land-use analysis of `query`
pub fn analysis_prompt(query: &str) -> String {
    format!(
        r#"Analyze the land use patterns and changes for the location and time period specified in the following query:

{query}

Provide a detailed response that includes:
1. A summary of significant changes in land use patterns over the specified time period.
2. Statistical data from reputable sources, including percentages of land use changes if available.
3. Key trends in urbanization, agricultural land conversion, and environmental impact.
4. Any relevant government policies or initiatives that have influenced these changes.
5. Citations or references to specific studies or reports that support your analysis.

Format your response with clear headings, bullet points for key information, and a section for additional resources or references.

Ensure that all information provided is factual and based on verifiable data or reputable studies. If specific data for the exact time period is not available, use the closest available data and note this in your response."#
    )
}

/// Prompt asking for the location/time attributes of `query` as JSON
pub fn extraction_prompt(query: &str, default_zoom: u8) -> String {
    format!(
        r#"Extract the following attributes from the given query:
1. Longitude
2. Latitude
3. Zoom level (default to {default_zoom} if not specified)
4. Start date
5. End date

Query: {query}

Respond ONLY with a valid JSON object using this exact format:
{{
    "longitude": <float>,
    "latitude": <float>,
    "zoom": <int>,
    "start_date": "<YYYY-MM-DD>",
    "end_date": "<YYYY-MM-DD>"
}}
Use your best judgment to infer values if they're not explicitly stated."#
    )
}
